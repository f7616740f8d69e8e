//! Binary semaphore
//!
//! A single flag, initially clear. `post` sets it and `try_pend` consumes it.
//! It does not count: posting while the flag is already set collapses into
//! the pending signal, and the caller is told so.

use core::cell::Cell;

use critical_section::Mutex;

use crate::error::{OsError, OsResult};

/// Binary (non-counting) semaphore
pub struct BinarySem {
    set: Mutex<Cell<bool>>,
}

impl BinarySem {
    /// Create a cleared semaphore
    pub const fn new() -> Self {
        BinarySem {
            set: Mutex::new(Cell::new(false)),
        }
    }

    /// Signal (post) the semaphore
    ///
    /// # Returns
    /// * `Ok(())` - the flag went from clear to set
    /// * `Err(OsError::SemOvf)` - it was already set; this post collapsed
    pub fn post(&self) -> OsResult<()> {
        critical_section::with(|cs| {
            let set = self.set.borrow(cs);
            if set.replace(true) {
                Err(OsError::SemOvf)
            } else {
                Ok(())
            }
        })
    }

    /// Take the semaphore without waiting
    ///
    /// # Returns
    /// * `Ok(())` - the flag was set and is now clear
    /// * `Err(OsError::PendWouldBlock)` - not signalled
    pub fn try_pend(&self) -> OsResult<()> {
        critical_section::with(|cs| {
            if self.set.borrow(cs).replace(false) {
                Ok(())
            } else {
                Err(OsError::PendWouldBlock)
            }
        })
    }

    /// Whether a post is waiting to be taken
    #[inline]
    pub fn is_set(&self) -> bool {
        critical_section::with(|cs| self.set.borrow(cs).get())
    }
}

impl Default for BinarySem {
    fn default() -> Self {
        Self::new()
    }
}
