//! Synchronization primitives
//!
//! Contains the overwrite mailbox, the bounded queue and the binary semaphore.
//! Each object serializes its own state with a critical section, so it can be
//! shared between tasks and interrupt handlers without further locking.
//! None of them block: a task that cannot proceed gets an error back and
//! pends on the matching wait flag.

pub mod mailbox;
pub mod queue;
pub mod sem;
