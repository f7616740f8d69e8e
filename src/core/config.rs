//! Compile-time configuration
//!
//! These constants fix the timing, capacities and priorities of the demo.
//! Nothing is configurable at runtime.

use crate::types::OsPrio;

/// Number of priority levels (one task per level)
pub const CFG_PRIO_MAX: usize = 8;

/// System tick rate in Hz
pub const CFG_TICK_RATE_HZ: u32 = 1000;

/// Core clock feeding SysTick (HSI on the STM32F401)
pub const CFG_CPU_CLOCK_HZ: u32 = 16_000_000;

/// Baud rate of the serial console
pub const CFG_SERIAL_BAUD: u32 = 115_200;

/// Capacity of the integer queue between Detector and Drain
pub const CFG_INTS_QUEUE_SIZE: usize = 4;

/// Producer publish period
pub const CFG_PRODUCER_PERIOD_MS: u32 = 5000;

/// Detector poll interval (polling variant only)
pub const CFG_DETECTOR_POLL_MS: u32 = 100;

/// A change with counter `n` is forwarded `n % CFG_FANOUT_MODULUS` times
pub const CFG_FANOUT_MODULUS: u32 = 5;

/// Random values are drawn from `0..=CFG_RANDOM_MAX`
pub const CFG_RANDOM_MAX: u32 = 100;

/// Seed of the firmware random source
pub const CFG_RANDOM_SEED: u64 = 1;

// ============ Task priorities (0 = highest) ============

/// Drain preempts everything else
pub const PRIO_DRAIN: OsPrio = 1;

/// Detector preempts the Producer
pub const PRIO_DETECTOR: OsPrio = 2;

/// Producer runs when nothing else is ready
pub const PRIO_PRODUCER: OsPrio = 3;
