//! Job definitions for queue processing.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::Operation;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job state as observed by pollers.
///
/// States only ever advance: `Queued -> Running -> Finished | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Job is waiting in queue
    #[default]
    Queued,
    /// Job has been claimed by a worker
    Running,
    /// Job completed successfully
    Finished,
    /// Job failed with an error
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Running => "running",
            JobState::Finished => "finished",
            JobState::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more transitions expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Finished | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Durable, pollable snapshot of one submitted job.
///
/// Created by the submission API in `Queued` state and exclusively owned
/// by whichever worker claims it thereafter. `result_key` and
/// `error_message` are each set at most once, by the executing worker,
/// when the corresponding terminal state is reached.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// Object key of the uploaded source bytes. Immutable once set.
    pub source_key: String,

    /// Ordered transformation chain, fixed at submission time.
    pub operations: Vec<Operation>,

    /// Job state
    #[serde(default)]
    pub state: JobState,

    /// Object key of the result, present only when `state == Finished`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_key: Option<String>,

    /// Human-readable cause, present only when `state == Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// When a worker claimed the job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// When the job reached a terminal state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a new job in `Queued` state.
    pub fn new(id: JobId, source_key: impl Into<String>, operations: Vec<Operation>) -> Self {
        let now = Utc::now();
        Self {
            id,
            source_key: source_key.into(),
            operations,
            state: JobState::Queued,
            result_key: None,
            error_message: None,
            created_at: now,
            updated_at: now,
            started_at: None,
            finished_at: None,
        }
    }

    /// Start processing the job.
    pub fn start(mut self) -> Self {
        self.state = JobState::Running;
        self.started_at = Some(Utc::now());
        self.updated_at = Utc::now();
        self
    }

    /// Mark job as finished with the key of the stored result.
    pub fn finish(mut self, result_key: impl Into<String>) -> Self {
        self.state = JobState::Finished;
        self.result_key = Some(result_key.into());
        self.finished_at = Some(Utc::now());
        self.updated_at = Utc::now();
        self
    }

    /// Mark job as failed.
    pub fn fail(mut self, error: impl Into<String>) -> Self {
        self.state = JobState::Failed;
        self.error_message = Some(error.into());
        self.finished_at = Some(Utc::now());
        self.updated_at = Utc::now();
        self
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Operation;

    fn sample_job() -> Job {
        Job::new(
            JobId::new(),
            "cat.jpg",
            vec![Operation::Resize { size: [100, 100] }],
        )
    }

    #[test]
    fn test_job_creation() {
        let job = sample_job();
        assert_eq!(job.state, JobState::Queued);
        assert_eq!(job.source_key, "cat.jpg");
        assert!(job.result_key.is_none());
        assert!(job.error_message.is_none());
    }

    #[test]
    fn test_job_state_transitions() {
        let job = sample_job();

        let started = job.start();
        assert_eq!(started.state, JobState::Running);
        assert!(started.started_at.is_some());
        assert!(!started.is_terminal());

        let finished = started.finish("processed_cat.jpg");
        assert_eq!(finished.state, JobState::Finished);
        assert_eq!(finished.result_key.as_deref(), Some("processed_cat.jpg"));
        assert!(finished.is_terminal());
    }

    #[test]
    fn test_job_failure() {
        let job = sample_job().start().fail("source object missing");
        assert_eq!(job.state, JobState::Failed);
        assert_eq!(job.error_message.as_deref(), Some("source object missing"));
        assert!(job.result_key.is_none());
        assert!(job.is_terminal());
    }

    #[test]
    fn test_job_state_wire_format() {
        assert_eq!(serde_json::to_string(&JobState::Queued).unwrap(), "\"queued\"");
        assert_eq!(serde_json::to_string(&JobState::Running).unwrap(), "\"running\"");
        assert_eq!(serde_json::to_string(&JobState::Finished).unwrap(), "\"finished\"");
        assert_eq!(serde_json::to_string(&JobState::Failed).unwrap(), "\"failed\"");
    }

    #[test]
    fn test_job_serde_roundtrip() {
        let job = sample_job().start();
        let json = serde_json::to_string(&job).expect("serialize Job");
        let decoded: Job = serde_json::from_str(&json).expect("deserialize Job");
        assert_eq!(decoded.id, job.id);
        assert_eq!(decoded.state, JobState::Running);
        assert_eq!(decoded.operations.len(), 1);
    }
}
