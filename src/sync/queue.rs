//! Bounded FIFO queue
//!
//! Fixed capacity ring buffer of `Copy` items. Sends into a full queue and
//! receives from an empty one fail with an explicit error instead of
//! blocking; the caller decides whether to pend.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::error::{OsError, OsResult};

struct Ring<T, const N: usize> {
    buf: [Option<T>; N],
    /// Index of the oldest item
    head: usize,
    len: usize,
}

impl<T: Copy, const N: usize> Ring<T, N> {
    const fn new() -> Self {
        Ring {
            buf: [None; N],
            head: 0,
            len: 0,
        }
    }

    fn push(&mut self, item: T) -> OsResult<()> {
        if self.len == N {
            return Err(OsError::QFull);
        }
        let tail = (self.head + self.len) % N;
        self.buf[tail] = Some(item);
        self.len += 1;
        Ok(())
    }

    fn pop(&mut self) -> OsResult<T> {
        if self.len == 0 {
            return Err(OsError::QEmpty);
        }
        let item = self.buf[self.head].take().ok_or(OsError::QEmpty)?;
        self.head = (self.head + 1) % N;
        self.len -= 1;
        Ok(item)
    }
}

/// Bounded queue of `N` items
pub struct Queue<T: Copy, const N: usize> {
    ring: Mutex<RefCell<Ring<T, N>>>,
}

impl<T: Copy, const N: usize> Queue<T, N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        assert!(N > 0, "queue capacity must be non-zero");
        Queue {
            ring: Mutex::new(RefCell::new(Ring::new())),
        }
    }

    /// Append `item` at the back
    ///
    /// # Returns
    /// * `Err(OsError::QFull)` - the queue holds `N` items; `item` is not stored
    pub fn try_send(&self, item: T) -> OsResult<()> {
        critical_section::with(|cs| self.ring.borrow_ref_mut(cs).push(item))
    }

    /// Remove the item at the front
    ///
    /// # Returns
    /// * `Err(OsError::QEmpty)` - nothing to receive
    pub fn try_receive(&self) -> OsResult<T> {
        critical_section::with(|cs| self.ring.borrow_ref_mut(cs).pop())
    }

    /// Number of queued items
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.ring.borrow_ref(cs).len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T: Copy, const N: usize> Default for Queue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
