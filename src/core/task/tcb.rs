//! Task Control Block (TCB) definition
//!
//! The TCB holds what the kernel needs to schedule one task.

use crate::types::{OsFlags, OsPrio, OsTaskState, OsTick};

/// Task Control Block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsTcb {
    /// Task name
    pub name: &'static str,
    /// Fixed priority
    pub prio: OsPrio,
    /// Current task state
    pub task_state: OsTaskState,
    /// Tick at which a delayed task becomes ready
    pub wake_at: OsTick,
    /// Flags being waited for
    pub flags_pend: OsFlags,
    /// Number of steps run so far
    pub run_ctr: u32,
}

impl OsTcb {
    /// Create a ready TCB
    pub const fn new(name: &'static str, prio: OsPrio) -> Self {
        OsTcb {
            name,
            prio,
            task_state: OsTaskState::Ready,
            wake_at: 0,
            flags_pend: 0,
            run_ctr: 0,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.task_state == OsTaskState::Ready
    }

    #[inline]
    pub fn is_delayed(&self) -> bool {
        self.task_state == OsTaskState::Delayed
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.task_state == OsTaskState::Pend
    }

    pub(crate) fn make_ready(&mut self) {
        self.task_state = OsTaskState::Ready;
        self.flags_pend = 0;
    }
}
