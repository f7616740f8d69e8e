//! Kernel modules
//!
//! Contains configuration, errors, the ready bitmap, tasks, time and the kernel loop.

pub mod config;
pub mod error;
pub mod kernel;
pub mod prio;
pub mod types;
pub mod task;
pub mod time;
