//! Wire payload handed from the submission API to workers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use imgpipe_models::{JobId, Operation};

/// A queued transformation request.
///
/// The payload references the source bytes by object key; the key must
/// already exist in the blob store when the job is enqueued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformJob {
    /// Unique job ID
    pub job_id: JobId,
    /// Object key of the uploaded source bytes
    pub source_key: String,
    /// Ordered operation chain, applied in submission order
    pub operations: Vec<Operation>,
    /// When the job was created
    pub created_at: DateTime<Utc>,
}

impl TransformJob {
    /// Create a new transform job with a fresh ID.
    pub fn new(source_key: impl Into<String>, operations: Vec<Operation>) -> Self {
        Self {
            job_id: JobId::new(),
            source_key: source_key.into(),
            operations,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgpipe_models::{FilterKind, Operation};

    #[test]
    fn transform_job_serde_roundtrip() {
        let job = TransformJob::new(
            "a.jpg",
            vec![
                Operation::Resize { size: [100, 100] },
                Operation::Filter {
                    filter_type: FilterKind::Blur,
                },
                Operation::Brightness { factor: 1.5 },
            ],
        );

        let json = serde_json::to_string(&job).expect("serialize TransformJob");
        let decoded: TransformJob = serde_json::from_str(&json).expect("deserialize TransformJob");

        assert_eq!(decoded.job_id, job.job_id);
        assert_eq!(decoded.source_key, "a.jpg");
        assert_eq!(decoded.operations, job.operations);
        assert_eq!(decoded.created_at, job.created_at);
    }

    #[test]
    fn transform_jobs_get_unique_ids() {
        let a = TransformJob::new("a.jpg", vec![]);
        let b = TransformJob::new("a.jpg", vec![]);
        assert_ne!(a.job_id, b.job_id);
    }
}
