//! Upload handler: store source bytes and enqueue a transform job.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use imgpipe_models::{Job, Operation};
use imgpipe_queue::TransformJob;
use imgpipe_storage::source_key;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Upload response.
#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub job_id: String,
}

/// POST /upload/
///
/// Multipart form with two fields:
/// - `file`: the binary image upload
/// - `operations`: a JSON array of operation objects
///
/// The source bytes are stored before the job is enqueued, so the queued
/// payload always references an existing object. Returns the job id
/// immediately; never waits for pipeline completion.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut file_name: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut file_content_type: Option<String> = None;
    let mut operations_raw: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                file_content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file field: {e}")))?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("operations") => {
                operations_raw = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read operations field: {e}"))
                })?);
            }
            _ => {}
        }
    }

    let bytes = file_bytes.ok_or_else(|| ApiError::bad_request("Missing file field"))?;
    let file_name =
        file_name.ok_or_else(|| ApiError::bad_request("Uploaded file has no filename"))?;
    let operations_raw =
        operations_raw.ok_or_else(|| ApiError::bad_request("Missing operations field"))?;

    // Malformed operations are a client fault, surfaced synchronously;
    // no source object or job exists afterwards.
    let operations: Vec<Operation> = serde_json::from_str(&operations_raw)
        .map_err(|e| ApiError::bad_request(format!("Invalid operations JSON: {e}")))?;
    for op in &operations {
        op.validate()
            .map_err(|e| ApiError::bad_request(format!("Invalid operation: {e}")))?;
    }

    let key = source_key(&file_name);
    info!(file = %key, operations = operations.len(), "Received upload");

    // The enqueued payload references this key; it must exist first.
    let content_type = file_content_type.unwrap_or_else(|| "application/octet-stream".to_string());
    state
        .storage
        .upload_bytes(bytes, &key, &content_type)
        .await?;

    let job = TransformJob::new(key, operations);
    let record = Job::new(
        job.job_id.clone(),
        job.source_key.clone(),
        job.operations.clone(),
    );
    state.jobs.put(&record).await?;
    state.queue.enqueue(&job).await?;
    metrics::record_job_enqueued();

    Ok(Json(UploadResponse {
        message: "File uploaded and processing started".to_string(),
        job_id: job.job_id.to_string(),
    }))
}
