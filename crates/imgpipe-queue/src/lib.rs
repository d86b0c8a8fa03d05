//! Redis Streams job queue.
//!
//! This crate provides:
//! - Job enqueueing via Redis Streams
//! - Worker consumption with consumer-group exclusivity and crash
//!   recovery via pending-entry claims
//! - The Redis-backed job status store that serves polling

pub mod error;
pub mod job;
pub mod queue;
pub mod status;

pub use error::{QueueError, QueueResult};
pub use job::TransformJob;
pub use queue::{JobQueue, QueueConfig};
pub use status::{JobStore, JOB_STATUS_TTL_SECS};
