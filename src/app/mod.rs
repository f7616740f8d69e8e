//! The three-task mailbox application
//!
//! | Task     | Tag  | Name     | Priority        |
//! |----------|------|----------|-----------------|
//! | Detector | T1   | "Task 1" | `PRIO_DETECTOR` |
//! | Producer | T2   | "Task 2" | `PRIO_PRODUCER` |
//! | Drain    | T3   | "Task 3" | `PRIO_DRAIN`    |
//!
//! All shared objects live in [`System`], which the kernel owns. Each task
//! keeps its own state; nothing is global.

mod console;
mod detector;
mod drain;
mod producer;
mod random;
mod record;

pub use console::{Console, Event, SerialConsole, TaskTag};
pub use detector::Detector;
pub use drain::Drain;
pub use producer::Producer;
pub use random::{Lcg, RandomSource};
pub use record::Record;

use crate::config::{CFG_INTS_QUEUE_SIZE, PRIO_DETECTOR, PRIO_DRAIN, PRIO_PRODUCER};
use crate::error::OsResult;
use crate::kernel::{Kernel, Pollable};
use crate::mailbox::Mailbox;
use crate::queue::Queue;
use crate::sem::BinarySem;
use crate::types::OsFlags;

/// Wait flags reported by [`System`]
pub mod wait {
    use crate::types::OsFlags;

    /// The mailbox holds a record
    pub const MAILBOX_DATA: OsFlags = 1 << 0;
    /// The integer queue has an item to receive
    pub const INTS_DATA: OsFlags = 1 << 1;
    /// The integer queue has room for a send
    pub const INTS_SPACE: OsFlags = 1 << 2;
    /// The rendezvous semaphore is signalled
    pub const RENDEZVOUS: OsFlags = 1 << 3;
}

/// How the Detector learns about new records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Peek the mailbox on a fixed interval; can miss updates
    Polling,
    /// Wait for the Producer's rendezvous signal before each peek
    Rendezvous,
}

/// Integer stream between Detector and Drain
pub type IntStream = Queue<i32, CFG_INTS_QUEUE_SIZE>;

/// Shared objects and the console
pub struct System<C> {
    pub mailbox: Mailbox<Record>,
    pub ints: IntStream,
    pub rendezvous: BinarySem,
    pub console: C,
}

impl<C> System<C> {
    pub const fn new(console: C) -> Self {
        System {
            mailbox: Mailbox::new(),
            ints: Queue::new(),
            rendezvous: BinarySem::new(),
            console,
        }
    }
}

impl<C: Console> System<C> {
    /// Write one console line for `tag`
    ///
    /// Tasks cannot stop on a lost line, so a failed write is only logged.
    pub fn report(&mut self, tag: TaskTag, event: Event) {
        if self.console.write_line(tag, event).is_err() {
            crate::warn!("console write failed");
        }
    }
}

impl<C> Pollable for System<C> {
    fn ready_flags(&self) -> OsFlags {
        let mut flags = 0;
        if !self.mailbox.is_empty() {
            flags |= wait::MAILBOX_DATA;
        }
        if !self.ints.is_empty() {
            flags |= wait::INTS_DATA;
        }
        if !self.ints.is_full() {
            flags |= wait::INTS_SPACE;
        }
        if self.rendezvous.is_set() {
            flags |= wait::RENDEZVOUS;
        }
        flags
    }
}

/// Register the three tasks at their fixed priorities
pub fn create_tasks<'t, C, R>(
    kernel: &mut Kernel<'t, System<C>>,
    detector: &'t mut Detector,
    producer: &'t mut Producer<R>,
    drain: &'t mut Drain,
) -> OsResult<()>
where
    C: Console,
    R: RandomSource,
{
    kernel.task_create("Task 1", PRIO_DETECTOR, detector)?;
    kernel.task_create("Task 2", PRIO_PRODUCER, producer)?;
    kernel.task_create("Task 3", PRIO_DRAIN, drain)?;
    Ok(())
}
