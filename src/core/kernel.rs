//! Kernel state and scheduling loop
//!
//! The kernel owns the shared environment and borrows one task per priority
//! level. Scheduling is run-to-block: the highest-priority ready task runs
//! one step, then readiness is re-evaluated, so a task that becomes ready
//! takes over at the next step boundary of a lower-priority one.
//!
//! Two kinds of waits exist:
//! - delays, woken by [`Kernel::tick_set`] when their deadline is reached
//! - pends on wait flags, woken whenever [`Pollable::ready_flags`] reports
//!   one of the flags. Flags are level-triggered: they describe the current
//!   state of the channels, so a wake-up cannot be lost.

use core::convert::Infallible;

use crate::config::CFG_PRIO_MAX;
use crate::error::{OsError, OsResult};
use crate::port::Port;
use crate::prio::PrioTable;
use crate::task::{Ctx, OsTcb, Step, Task};
use crate::time;
use crate::types::{OsFlags, OsPrio, OsTaskState, OsTick};

/// Environment whose state can satisfy pended tasks
pub trait Pollable {
    /// Wait flags whose condition currently holds
    fn ready_flags(&self) -> OsFlags;
}

struct Slot<'t, E> {
    tcb: OsTcb,
    task: &'t mut dyn Task<E>,
}

/// Fixed-priority run-to-block kernel
pub struct Kernel<'t, E> {
    env: E,
    slots: [Option<Slot<'t, E>>; CFG_PRIO_MAX],
    rdy: PrioTable,
    now: OsTick,
}

impl<'t, E: Pollable> Kernel<'t, E> {
    /// Create a kernel owning `env`, with no tasks and the clock at tick 0
    pub fn new(env: E) -> Self {
        Kernel {
            env,
            slots: core::array::from_fn(|_| None),
            rdy: PrioTable::new(),
            now: 0,
        }
    }

    /// Register a task at a fixed priority (0 = highest)
    ///
    /// # Returns
    /// * `Err(OsError::PrioInvalid)` - `prio >= CFG_PRIO_MAX`
    /// * `Err(OsError::PrioExist)` - another task already holds `prio`
    pub fn task_create(
        &mut self,
        name: &'static str,
        prio: OsPrio,
        task: &'t mut dyn Task<E>,
    ) -> OsResult<()> {
        let slot = self
            .slots
            .get_mut(prio as usize)
            .ok_or(OsError::PrioInvalid)?;

        if slot.is_some() {
            return Err(OsError::PrioExist);
        }

        *slot = Some(Slot {
            tcb: OsTcb::new(name, prio),
            task,
        });
        self.rdy.insert(prio);

        crate::info!("task {} created at prio {}", name, prio);
        Ok(())
    }

    /// Current tick
    #[inline]
    pub fn now(&self) -> OsTick {
        self.now
    }

    #[inline]
    pub fn env(&self) -> &E {
        &self.env
    }

    #[inline]
    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Control block of the task at `prio`
    pub fn tcb(&self, prio: OsPrio) -> Option<&OsTcb> {
        self.slots
            .get(prio as usize)
            .and_then(|slot| slot.as_ref())
            .map(|slot| &slot.tcb)
    }

    /// State of the task at `prio`
    pub fn task_state(&self, prio: OsPrio) -> Option<OsTaskState> {
        self.tcb(prio).map(|tcb| tcb.task_state)
    }

    /// Move the clock to `now` and wake delayed tasks whose deadline passed
    pub fn tick_set(&mut self, now: OsTick) {
        self.now = now;

        for slot in self.slots.iter_mut().flatten() {
            if slot.tcb.is_delayed() && time::is_reached(now, slot.tcb.wake_at) {
                slot.tcb.make_ready();
                self.rdy.insert(slot.tcb.prio);
            }
        }
    }

    /// Make pended tasks ready if their wait condition holds
    fn wake_pended(&mut self) {
        let flags = self.env.ready_flags();
        if flags == 0 {
            return;
        }

        for slot in self.slots.iter_mut().flatten() {
            if slot.tcb.is_pending() && slot.tcb.flags_pend & flags != 0 {
                slot.tcb.make_ready();
                self.rdy.insert(slot.tcb.prio);
            }
        }
    }

    /// Run one step of the highest-priority ready task
    ///
    /// Returns `false` when no task is ready.
    pub fn run_once(&mut self) -> bool {
        self.wake_pended();

        let Some(prio) = self.rdy.highest() else {
            return false;
        };

        let Kernel { env, slots, rdy, now } = self;
        let Some(slot) = slots[prio as usize].as_mut() else {
            rdy.remove(prio);
            return true;
        };

        let mut ctx = Ctx::new(env, *now);
        let step = slot.task.run(&mut ctx);
        slot.tcb.run_ctr = slot.tcb.run_ctr.wrapping_add(1);

        match step {
            Step::Yield | Step::Delay(0) => {}
            Step::Delay(ticks) => {
                slot.tcb.task_state = OsTaskState::Delayed;
                slot.tcb.wake_at = time::deadline(*now, ticks);
                rdy.remove(prio);
            }
            Step::Pend(flags) => {
                debug_assert!(flags != 0, "pend on no flags never wakes");
                crate::trace!("{} pends on {=u32:#x}", slot.tcb.name, flags);
                slot.tcb.task_state = OsTaskState::Pend;
                slot.tcb.flags_pend = flags;
                rdy.remove(prio);
            }
        }

        true
    }

    /// Run steps until no task is ready; returns the number of steps run
    pub fn run_until_idle(&mut self) -> usize {
        let mut steps = 0;
        while self.run_once() {
            steps += 1;
        }
        steps
    }

    /// Host-side driver: advance the clock one tick at a time, running to idle
    /// after each tick
    pub fn advance(&mut self, ticks: OsTick) {
        for _ in 0..ticks {
            self.tick_set(self.now.wrapping_add(1));
            self.run_until_idle();
        }
    }

    /// One iteration of the scheduler loop against a hardware port
    pub fn poll<P: Port>(&mut self, port: &mut P) {
        let now = port.ticks();
        if now != self.now {
            self.tick_set(now);
        }
        self.run_until_idle();
        port.idle();
    }

    /// Start multitasking
    ///
    /// Never returns once at least one task exists.
    ///
    /// # Returns
    /// * `Err(OsError::OsNoAppTask)` - no task was created
    pub fn start<P: Port>(mut self, port: &mut P) -> OsResult<Infallible> {
        if self.slots.iter().all(Option::is_none) {
            return Err(OsError::OsNoAppTask);
        }

        crate::info!("starting scheduler");
        loop {
            self.poll(port);
        }
    }
}
