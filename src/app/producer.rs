//! Producer task (T2)
//!
//! Every period publishes a fresh [`Record`] into the mailbox. The first
//! publish happens one full period after start.

use super::{Console, Event, RandomSource, Record, System, TaskTag, Variant};
use crate::config::{CFG_PRODUCER_PERIOD_MS, CFG_RANDOM_MAX};
use crate::task::{Ctx, Step, Task};
use crate::time::ms_to_ticks;
use crate::types::OsTick;

pub struct Producer<R> {
    rng: R,
    /// Counter of the next record; never 0
    count: u32,
    period: OsTick,
    variant: Variant,
    primed: bool,
}

impl<R: RandomSource> Producer<R> {
    pub fn new(rng: R, variant: Variant) -> Self {
        Producer {
            rng,
            count: 1,
            period: ms_to_ticks(CFG_PRODUCER_PERIOD_MS),
            variant,
            primed: false,
        }
    }

    /// Override the publish period, at least one tick
    pub fn with_period(mut self, period: OsTick) -> Self {
        self.period = period.max(1);
        self
    }

    /// Counter the next record will carry
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    fn draw(&mut self) -> i32 {
        (self.rng.next_random() % (CFG_RANDOM_MAX + 1)) as i32
    }

    /// Build and publish the next record, signalling the rendezvous in that
    /// variant
    pub fn publish<C: Console>(&mut self, sys: &mut System<C>) -> Record {
        let record = Record::new(self.count, self.draw());

        if sys.mailbox.overwrite(record).is_some() {
            crate::debug!("previous record replaced before any peek");
        }
        sys.report(TaskTag::T2, Event::DataSent);

        if self.variant == Variant::Rendezvous && sys.rendezvous.post().is_err() {
            crate::debug!("rendezvous still signalled, post collapsed");
        }

        // Skip 0 on wrap so the ratio never divides by zero
        self.count = self.count.wrapping_add(1).max(1);
        record
    }
}

impl<C: Console, R: RandomSource> Task<System<C>> for Producer<R> {
    fn run(&mut self, ctx: &mut Ctx<'_, System<C>>) -> Step {
        if !self.primed {
            self.primed = true;
            return Step::Delay(self.period);
        }

        self.publish(ctx.env_mut());
        Step::Delay(self.period)
    }
}
