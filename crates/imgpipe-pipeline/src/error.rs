//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to decode source image: {0}")]
    Decode(String),

    #[error("Failed to encode result image: {0}")]
    Encode(String),
}
