//! Single-slot overwrite mailbox
//!
//! Holds the most recent value only. Publishing always succeeds and replaces
//! whatever was there; reading is a non-consuming peek, so the value stays
//! available to every later reader until the next publish.

use core::cell::Cell;

use critical_section::Mutex;

use crate::error::{OsError, OsResult};

#[derive(Clone, Copy)]
struct Slot<T> {
    value: T,
    /// Whether a peek has observed `value`
    seen: bool,
}

/// Capacity-1 mailbox with overwrite semantics
pub struct Mailbox<T: Copy> {
    slot: Mutex<Cell<Option<Slot<T>>>>,
}

impl<T: Copy> Mailbox<T> {
    /// Create an empty mailbox
    pub const fn new() -> Self {
        Mailbox {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Publish `value`, replacing the current one
    ///
    /// # Returns
    /// The replaced value if no peek ever observed it, i.e. an update that
    /// readers missed.
    pub fn overwrite(&self, value: T) -> Option<T> {
        critical_section::with(|cs| {
            let cell = self.slot.borrow(cs);
            let missed = cell.get().filter(|slot| !slot.seen).map(|slot| slot.value);
            cell.set(Some(Slot { value, seen: false }));
            missed
        })
    }

    /// Read the current value without consuming it
    ///
    /// # Returns
    /// * `Err(OsError::QEmpty)` - nothing was published yet
    pub fn peek(&self) -> OsResult<T> {
        critical_section::with(|cs| {
            let cell = self.slot.borrow(cs);
            let mut slot = cell.get().ok_or(OsError::QEmpty)?;
            slot.seen = true;
            cell.set(Some(slot));
            Ok(slot.value)
        })
    }

    /// Whether nothing was published yet
    pub fn is_empty(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).get().is_none())
    }

    /// Whether the current value was published after the last peek
    pub fn has_unseen(&self) -> bool {
        critical_section::with(|cs| {
            self.slot.borrow(cs).get().is_some_and(|slot| !slot.seen)
        })
    }
}

impl<T: Copy> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}
