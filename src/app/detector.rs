//! Detector task (T1)
//!
//! Peeks the mailbox, and when the record differs from the last one seen,
//! prints it and forwards its random value `count mod 5` times into the
//! integer queue.
//!
//! A full queue blocks the Detector until the Drain makes room; forwards are
//! never dropped. Each send is its own step so the Drain can take over
//! between sends.
//!
//! In the polling variant two publishes between polls hide the first record
//! from the Detector. This is inherent to polling a newest-wins mailbox and
//! is left as is; the rendezvous variant avoids it.

use super::{wait, Console, Event, Record, System, TaskTag, Variant};
use crate::config::CFG_DETECTOR_POLL_MS;
use crate::task::{Ctx, Step, Task};
use crate::time::ms_to_ticks;
use crate::types::OsTick;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for the next poll or rendezvous
    Wait,
    /// Allowed to peek; blocks while the mailbox is empty
    Check,
    /// Forwarding `value`, `remaining` sends left
    Forward { value: i32, remaining: u32 },
}

pub struct Detector {
    variant: Variant,
    poll: OsTick,
    last_seen: Record,
    phase: Phase,
    changes: u32,
}

impl Detector {
    pub fn new(variant: Variant) -> Self {
        Detector {
            variant,
            poll: ms_to_ticks(CFG_DETECTOR_POLL_MS),
            last_seen: Record::default(),
            phase: Phase::Wait,
            changes: 0,
        }
    }

    pub fn polling() -> Self {
        Self::new(Variant::Polling)
    }

    pub fn rendezvous() -> Self {
        Self::new(Variant::Rendezvous)
    }

    /// Override the poll interval (polling variant), at least one tick
    pub fn with_poll_interval(mut self, poll: OsTick) -> Self {
        self.poll = poll.max(1);
        self
    }

    /// Last record treated as a change
    #[inline]
    pub fn last_seen(&self) -> Record {
        self.last_seen
    }

    /// Number of changes detected
    #[inline]
    pub fn changes(&self) -> u32 {
        self.changes
    }

    /// Whether forwards of the last change are still outstanding
    #[inline]
    pub fn is_forwarding(&self) -> bool {
        matches!(self.phase, Phase::Forward { .. })
    }

    fn finish(&mut self) -> Step {
        self.phase = Phase::Wait;
        match self.variant {
            Variant::Polling => Step::Delay(self.poll),
            Variant::Rendezvous => Step::Yield,
        }
    }

    fn check<C: Console>(&mut self, sys: &mut System<C>) -> Step {
        let Ok(current) = sys.mailbox.peek() else {
            return Step::Pend(wait::MAILBOX_DATA);
        };

        if current == self.last_seen {
            return self.finish();
        }

        sys.report(TaskTag::T1, Event::ChangeReceived);
        sys.report(TaskTag::T1, Event::Count(current.count));
        sys.report(TaskTag::T1, Event::Random(current.random));
        sys.report(TaskTag::T1, Event::Division(current.ratio));

        self.last_seen = current;
        self.changes = self.changes.wrapping_add(1);

        match current.fanout() {
            0 => self.finish(),
            n => self.forward(sys, current.random, n),
        }
    }

    fn forward<C: Console>(&mut self, sys: &mut System<C>, value: i32, remaining: u32) -> Step {
        self.phase = Phase::Forward { value, remaining };

        if sys.ints.try_send(value).is_err() {
            crate::warn!("intsQueue full, {} sends waiting for space", remaining);
            return Step::Pend(wait::INTS_SPACE);
        }
        sys.report(TaskTag::T1, Event::RandomSent);

        match remaining - 1 {
            0 => self.finish(),
            left => {
                self.phase = Phase::Forward { value, remaining: left };
                Step::Yield
            }
        }
    }
}

impl<C: Console> Task<System<C>> for Detector {
    fn run(&mut self, ctx: &mut Ctx<'_, System<C>>) -> Step {
        let sys = ctx.env_mut();
        match self.phase {
            Phase::Wait => {
                if self.variant == Variant::Rendezvous && sys.rendezvous.try_pend().is_err() {
                    return Step::Pend(wait::RENDEZVOUS);
                }
                self.phase = Phase::Check;
                self.check(sys)
            }
            Phase::Check => self.check(sys),
            Phase::Forward { value, remaining } => self.forward(sys, value, remaining),
        }
    }
}
