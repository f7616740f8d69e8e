//! Drain task (T3): report every integer the Detector forwards

use super::{wait, Console, Event, System, TaskTag};
use crate::task::{Ctx, Step, Task};

#[derive(Debug, Default)]
pub struct Drain {
    received: u32,
}

impl Drain {
    pub const fn new() -> Self {
        Drain { received: 0 }
    }

    /// Integers received so far
    #[inline]
    pub fn received(&self) -> u32 {
        self.received
    }
}

impl<C: Console> Task<System<C>> for Drain {
    fn run(&mut self, ctx: &mut Ctx<'_, System<C>>) -> Step {
        let sys = ctx.env_mut();
        match sys.ints.try_receive() {
            Ok(value) => {
                sys.report(TaskTag::T3, Event::Received(value));
                self.received = self.received.wrapping_add(1);
                Step::Yield
            }
            Err(_) => Step::Pend(wait::INTS_DATA),
        }
    }
}
