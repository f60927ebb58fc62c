//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Purge sweep: removes entries past their deadline at a configured interval

mod purge;

pub use purge::{spawn_purge_task, PurgeTask};
