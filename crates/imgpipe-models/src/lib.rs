//! Shared data models for the imgpipe backend.
//!
//! This crate provides Serde-serializable types for:
//! - Job identity, state, and pollable job records
//! - The transformation operation wire schema

pub mod job;
pub mod operation;

// Re-export common types
pub use job::{Job, JobId, JobState};
pub use operation::{FilterKind, InvalidOperation, Operation};
