//! Transform job processing.

use std::sync::Arc;

use imgpipe_queue::{JobStore, TransformJob};
use imgpipe_storage::{result_key, R2Client};

use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;

/// Shared clients handed to every job execution.
pub struct ProcessingContext {
    pub storage: Arc<R2Client>,
    pub jobs: Arc<JobStore>,
}

impl ProcessingContext {
    pub fn new(storage: Arc<R2Client>, jobs: Arc<JobStore>) -> Self {
        Self { storage, jobs }
    }
}

/// Run one transform job to completion and return the result key.
///
/// Fetches the source bytes, folds the operation chain, and writes the
/// result back under the derived key. The result upload completes before
/// the caller records `Finished`, so a poller observing that state can
/// always fetch the object.
pub async fn process_transform(
    ctx: &ProcessingContext,
    job: &TransformJob,
) -> WorkerResult<String> {
    let logger = JobLogger::new(&job.job_id, "transform");
    logger.log_start(&format!(
        "{} with {} operations",
        job.source_key,
        job.operations.len()
    ));

    let source = ctx.storage.download_bytes(&job.source_key).await?;
    logger.log_progress(&format!("fetched {} source bytes", source.len()));

    // The fold is CPU-bound; keep it off the async reactor.
    let operations = job.operations.clone();
    let result = tokio::task::spawn_blocking(move || imgpipe_pipeline::apply(&source, &operations))
        .await
        .map_err(|e| WorkerError::job_failed(format!("pipeline task panicked: {e}")))??;

    let key = result_key(&job.source_key);
    ctx.storage
        .upload_bytes(result, &key, "image/jpeg")
        .await?;

    logger.log_success(&format!("result stored at {key}"));
    Ok(key)
}
