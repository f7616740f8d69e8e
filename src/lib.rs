//! Mailbox demo on a small fixed-priority kernel
//!
//! Three tasks share two channels:
//! - a Producer overwrites a one-slot [`Mailbox`](sync::mailbox::Mailbox) on a timer
//! - a Detector peeks it, and on change forwards `count mod 5` copies of the
//!   random value into a bounded [`Queue`](sync::queue::Queue)
//! - a Drain receives and reports those integers
//!
//! The rendezvous variant adds a [`BinarySem`](sync::sem::BinarySem) so the
//! Detector wakes once per publish instead of polling.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

// ============ Critical Section ============

#[cfg(target_arch = "arm")]
mod cs_impl {
    use cortex_m::interrupt;
    use cortex_m::register::primask;
    use critical_section::{set_impl, Impl, RawRestoreState};

    struct SingleCoreCriticalSection;
    set_impl!(SingleCoreCriticalSection);

    unsafe impl Impl for SingleCoreCriticalSection {
        unsafe fn acquire() -> RawRestoreState {
            let was_active = primask::read().is_active();
            interrupt::disable();
            was_active
        }

        unsafe fn release(was_active: RawRestoreState) {
            if was_active {
                unsafe { interrupt::enable() }
            }
        }
    }
}

// ============ Modules ============

pub mod log;
mod lang_items;

pub mod core;
pub mod sync;
pub mod port;
pub mod app;

// ============ Re-exports ============

pub use crate::core::config;
pub use crate::core::config::*;
pub use crate::core::error;
pub use crate::core::error::{OsError, OsResult};
pub use crate::core::kernel;
pub use crate::core::kernel::{Kernel, Pollable};
pub use crate::core::prio;
pub use crate::core::types;
pub use crate::core::types::*;
pub use crate::core::task;
pub use crate::core::task::{Ctx, Step, Task};
pub use crate::core::time;

pub use sync::mailbox;
pub use sync::queue;
pub use sync::sem;

#[cfg(feature = "pac")]
pub use stm32_metapac as pac;
