//! Priority bitmap for O(1) highest-ready lookup
//!
//! Bit 0 of word 0 is the highest priority (0); priorities increase toward
//! lower significance and higher word indices, so the highest ready task is
//! found with a count-leading-zeros.

use crate::config::CFG_PRIO_MAX;
use crate::types::OsPrio;

/// Number of words needed for the priority bitmap
const PRIO_TBL_SIZE: usize = (CFG_PRIO_MAX + 31) / 32;

/// Priority bitmap table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrioTable {
    bitmap: [u32; PRIO_TBL_SIZE],
}

impl PrioTable {
    pub const fn new() -> Self {
        PrioTable {
            bitmap: [0; PRIO_TBL_SIZE],
        }
    }

    #[inline]
    fn locate(prio: OsPrio) -> (usize, u32) {
        debug_assert!((prio as usize) < CFG_PRIO_MAX);
        ((prio / 32) as usize, 1 << (31 - (prio % 32)))
    }

    /// Mark a priority as set
    #[inline]
    pub fn insert(&mut self, prio: OsPrio) {
        let (word, mask) = Self::locate(prio);
        self.bitmap[word] |= mask;
    }

    /// Clear a priority
    #[inline]
    pub fn remove(&mut self, prio: OsPrio) {
        let (word, mask) = Self::locate(prio);
        self.bitmap[word] &= !mask;
    }

    /// Highest set priority, or `None` when the table is empty
    #[inline]
    pub fn highest(&self) -> Option<OsPrio> {
        let mut base: OsPrio = 0;
        for &word in self.bitmap.iter() {
            if word != 0 {
                return Some(base + word.leading_zeros() as OsPrio);
            }
            base += 32;
        }
        None
    }

    #[inline]
    pub fn is_set(&self, prio: OsPrio) -> bool {
        let (word, mask) = Self::locate(prio);
        self.bitmap[word] & mask != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bitmap.iter().all(|&w| w == 0)
    }
}

impl Default for PrioTable {
    fn default() -> Self {
        Self::new()
    }
}
