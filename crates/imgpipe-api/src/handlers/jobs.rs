//! Job status polling handler.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use imgpipe_models::{JobId, JobState};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Job status response.
///
/// `processed_url` is present only for finished jobs, `message` only for
/// failed ones.
#[derive(Serialize)]
pub struct JobStatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /job_status/:job_id
///
/// Poll the current state of a job. Results are only ever reported here;
/// asynchronous failures are never surfaced anywhere else.
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatusResponse>> {
    let id = JobId::from_string(job_id);

    let Some(job) = state.jobs.fetch(&id).await? else {
        return Err(ApiError::not_found("Job not found"));
    };

    let response = match job.state {
        JobState::Queued | JobState::Running => JobStatusResponse {
            status: job.state.to_string(),
            job_id: None,
            processed_url: None,
            message: None,
        },
        JobState::Finished => {
            // mark_finished always records the key; guard anyway so a
            // corrupt record degrades to an explicit server error.
            let result_key = job.result_key.as_deref().ok_or_else(|| {
                ApiError::internal(format!("finished job {} has no result key", job.id))
            })?;
            JobStatusResponse {
                status: job.state.to_string(),
                job_id: Some(job.id.to_string()),
                processed_url: Some(state.urls.url_for(result_key)),
                message: None,
            }
        }
        JobState::Failed => JobStatusResponse {
            status: job.state.to_string(),
            job_id: None,
            processed_url: None,
            message: Some(
                job.error_message
                    .unwrap_or_else(|| "Image processing failed".to_string()),
            ),
        },
    };

    Ok(Json(response))
}
