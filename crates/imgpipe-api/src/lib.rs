//! Axum HTTP API server for image transformation jobs.
//!
//! This crate provides:
//! - Multipart upload + enqueue endpoint
//! - Job status polling endpoint
//! - Health/readiness probes and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
