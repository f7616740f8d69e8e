//! Error types
//!
//! Uses Rust's Result pattern; the numeric codes follow μC/OS-III.

use core::fmt;

/// RTOS error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[repr(u16)]
pub enum OsError {
    // ============ OS state errors ============
    /// `start` called before any task was created
    OsNoAppTask = 24204,

    // ============ Pend errors ============
    /// Pend would block (non-blocking mode)
    PendWouldBlock = 25008,

    // ============ Priority errors ============
    /// Priority already taken by another task
    PrioExist = 25201,
    /// Priority outside `0..CFG_PRIO_MAX`
    PrioInvalid = 25203,

    // ============ Queue errors ============
    /// Queue is full
    QFull = 26001,
    /// Queue (or mailbox) is empty
    QEmpty = 26002,

    // ============ Semaphore errors ============
    /// Binary semaphore already signalled; the post collapsed into the pending one
    SemOvf = 28101,
}

/// Result type alias for RTOS operations
pub type OsResult<T> = Result<T, OsError>;

impl OsError {
    /// Numeric error code
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            OsError::OsNoAppTask => "no application task created",
            OsError::PendWouldBlock => "pend would block",
            OsError::PrioExist => "priority already in use",
            OsError::PrioInvalid => "invalid priority",
            OsError::QFull => "queue full",
            OsError::QEmpty => "queue empty",
            OsError::SemOvf => "semaphore already signalled",
        };
        write!(f, "{} ({})", msg, self.code())
    }
}
