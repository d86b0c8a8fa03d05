//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Storage error: {0}")]
    Storage(#[from] imgpipe_storage::StorageError),

    #[error("Queue error: {0}")]
    Queue(#[from] imgpipe_queue::QueueError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] imgpipe_pipeline::PipelineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgpipe_pipeline::PipelineError;
    use imgpipe_storage::StorageError;

    #[test]
    fn error_messages_name_the_cause() {
        let e = WorkerError::from(StorageError::not_found("a.jpg"));
        assert!(e.to_string().contains("a.jpg"));

        let e = WorkerError::from(PipelineError::Decode("bad magic".into()));
        assert!(e.to_string().contains("decode"));
    }
}
