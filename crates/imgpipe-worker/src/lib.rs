//! Image transformation worker.
//!
//! This crate provides:
//! - Job executor with bounded concurrency and graceful shutdown
//! - Transform processing: fetch source, run pipeline, persist result
//! - Crash recovery by claiming idle pending jobs

pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod processor;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use logging::JobLogger;
pub use processor::{process_transform, ProcessingContext};
