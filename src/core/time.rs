//! Time management
//!
//! Tick conversions and wrap-safe deadline checks. The tick counter itself
//! lives in the port layer (hardware) or in the kernel (host driver).

use crate::config::CFG_TICK_RATE_HZ;
use crate::types::OsTick;

/// Convert milliseconds to ticks, rounding down
#[inline]
pub const fn ms_to_ticks(ms: u32) -> OsTick {
    ((ms as u64 * CFG_TICK_RATE_HZ as u64) / 1000) as OsTick
}

/// Deadline `delay` ticks after `now`
#[inline]
pub fn deadline(now: OsTick, delay: OsTick) -> OsTick {
    now.wrapping_add(delay)
}

/// Whether `deadline` has been reached at `now`, tolerant of counter wrap
#[inline]
pub fn is_reached(now: OsTick, deadline: OsTick) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}
