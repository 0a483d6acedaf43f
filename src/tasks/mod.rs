//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries at the configured check period

mod cleanup;

pub use cleanup::{spawn_cleanup_task, sweep, SWEEP_BATCH};
