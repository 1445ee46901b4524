//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of the cache.
//!
//! # Tasks
//! - Sweep: Removes expired cache entries at a fixed interval

mod sweep;

pub use sweep::{spawn_sweep_task, SweepTask, MIN_SWEEP_INTERVAL};
