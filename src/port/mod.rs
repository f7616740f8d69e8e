//! Port layer - CPU-specific pieces
//!
//! The kernel needs a tick source and a way to idle the CPU. On Cortex-M the
//! tick comes from SysTick and idling is `wfi`; the serial console lives here
//! too.

use crate::types::OsTick;

#[cfg(target_arch = "arm")]
pub mod cortex_m4;

#[cfg(target_arch = "arm")]
pub use cortex_m4::*;

/// Tick source and idle hook used by [`Kernel::poll`](crate::Kernel::poll)
pub trait Port {
    /// Ticks elapsed since the port started
    fn ticks(&self) -> OsTick;

    /// Called when no task is ready; may sleep until the next interrupt
    fn idle(&mut self);
}
