//! Cloudflare R2 storage client.
//!
//! This crate provides:
//! - Byte upload/download against the R2 S3 API
//! - Source/result object key conventions
//! - Public delivery URL derivation

pub mod client;
pub mod error;
pub mod keys;

pub use client::{R2Client, R2Config};
pub use error::{StorageError, StorageResult};
pub use keys::{result_key, source_key, PublicUrls};
