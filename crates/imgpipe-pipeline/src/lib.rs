//! Pure image transformation pipeline.
//!
//! `apply` is a deterministic function from (source bytes, ordered
//! operation list) to encoded result bytes. It performs no I/O, which is
//! what lets the worker re-run it safely on queue redelivery.

pub mod error;
pub mod transform;

pub use error::{PipelineError, PipelineResult};
pub use transform::apply;
