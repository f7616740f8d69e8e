//! The record exchanged through the mailbox

use crate::config::CFG_FANOUT_MODULUS;

/// One Producer sample
///
/// Compared by value on all three fields. The default (all zero) record is
/// the Detector's initial last-seen value, so the first real record always
/// counts as a change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Record {
    /// Publish counter, starts at 1 and is never 0
    pub count: u32,
    /// Random sample
    pub random: i32,
    /// `random / count`
    pub ratio: f32,
}

impl Record {
    /// Build a record, deriving `ratio` from the other fields
    pub fn new(count: u32, random: i32) -> Self {
        debug_assert!(count != 0);
        Record {
            count,
            random,
            ratio: random as f32 / count as f32,
        }
    }

    /// How many copies of `random` a change to this record forwards
    #[inline]
    pub fn fanout(&self) -> u32 {
        self.count % CFG_FANOUT_MODULUS
    }
}
