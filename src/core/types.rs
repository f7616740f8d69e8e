//! Core type definitions

/// Task priority (0 = highest priority)
pub type OsPrio = u8;

/// Tick counter type
pub type OsTick = u32;

/// Wait-condition flags a task can pend on
pub type OsFlags = u32;

/// Task state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[repr(u8)]
pub enum OsTaskState {
    /// Task is ready to run
    Ready = 0,
    /// Task sleeps until a tick deadline
    Delayed = 1,
    /// Task is pending on one or more wait flags
    Pend = 2,
}
