//! Task interface
//!
//! A task is a state machine the kernel steps. Each call to [`Task::run`]
//! performs at most one unit of work and reports how the task wants to
//! continue. Tasks never block inside `run`: a blocking wait is expressed by
//! returning [`Step::Delay`] or [`Step::Pend`], and the kernel calls `run`
//! again once the wait is over. A woken task retries the operation that made
//! it wait.

mod tcb;

pub use tcb::OsTcb;

use crate::types::{OsFlags, OsTick};

/// What a task asks the kernel to do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Still ready; run again when it is the highest ready task
    Yield,
    /// Sleep for the given number of ticks (0 behaves like `Yield`)
    Delay(OsTick),
    /// Block until any of the given wait flags is reported ready
    Pend(OsFlags),
}

/// Execution context handed to a task for one step
pub struct Ctx<'a, E> {
    env: &'a mut E,
    now: OsTick,
}

impl<'a, E> Ctx<'a, E> {
    pub fn new(env: &'a mut E, now: OsTick) -> Self {
        Ctx { env, now }
    }

    /// Shared environment (channels, console)
    #[inline]
    pub fn env_mut(&mut self) -> &mut E {
        self.env
    }

    /// Current tick
    #[inline]
    pub fn now(&self) -> OsTick {
        self.now
    }
}

/// A schedulable unit of work
pub trait Task<E> {
    /// Run one step
    fn run(&mut self, ctx: &mut Ctx<'_, E>) -> Step;
}
