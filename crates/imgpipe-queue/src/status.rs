//! Redis-backed job records for status polling.
//!
//! The submission API writes the initial record; the worker that claims
//! the job owns every transition after that. Pollers read snapshots via
//! `fetch`, which treats an unknown or expired id as a normal `None`.

use redis::AsyncCommands;
use tracing::{debug, warn};

use imgpipe_models::{Job, JobId};

use crate::error::QueueResult;

/// How long a job record stays pollable after its last update.
pub const JOB_STATUS_TTL_SECS: u64 = 7 * 24 * 3600;

/// Job record store.
pub struct JobStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl JobStore {
    /// Create a new job store.
    pub fn new(redis_url: &str) -> QueueResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            ttl_secs: JOB_STATUS_TTL_SECS,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> QueueResult<Self> {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let ttl_secs = std::env::var("JOB_STATUS_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(JOB_STATUS_TTL_SECS);

        let client = redis::Client::open(redis_url.as_str())?;
        Ok(Self { client, ttl_secs })
    }

    fn record_key(id: &JobId) -> String {
        format!("imgpipe:job:{}", id)
    }

    /// Write a job record.
    pub async fn put(&self, job: &Job) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(job)?;
        conn.set_ex::<_, _, ()>(Self::record_key(&job.id), payload, self.ttl_secs)
            .await?;
        debug!("Stored record for job {}", job.id);
        Ok(())
    }

    /// Fetch the current snapshot of a job.
    ///
    /// An unknown or expired id yields `Ok(None)` — a valid,
    /// non-exceptional outcome.
    pub async fn fetch(&self, id: &JobId) -> QueueResult<Option<Job>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(Self::record_key(id)).await?;
        match payload {
            Some(p) => Ok(Some(serde_json::from_str(&p)?)),
            None => Ok(None),
        }
    }

    /// Transition a job to `Running`.
    pub async fn mark_running(&self, id: &JobId) -> QueueResult<()> {
        self.update(id, |job| job.start()).await
    }

    /// Transition a job to `Finished` with its result key.
    ///
    /// Callers must have made the result object durable first, so a
    /// poller observing `Finished` can always fetch it.
    pub async fn mark_finished(&self, id: &JobId, result_key: &str) -> QueueResult<()> {
        self.update(id, |job| job.finish(result_key)).await
    }

    /// Transition a job to `Failed` with a human-readable cause.
    pub async fn mark_failed(&self, id: &JobId, error: &str) -> QueueResult<()> {
        self.update(id, |job| job.fail(error)).await
    }

    /// Read-modify-write a record, skipping records already terminal.
    ///
    /// States only ever advance; a redelivered job that already reached
    /// `Finished` or `Failed` must not be rewound by a second delivery.
    async fn update<F>(&self, id: &JobId, f: F) -> QueueResult<()>
    where
        F: FnOnce(Job) -> Job,
    {
        let Some(job) = self.fetch(id).await? else {
            warn!("No record for job {}, skipping state update", id);
            return Ok(());
        };

        if job.is_terminal() {
            warn!(
                "Job {} already {}, ignoring state update",
                id,
                job.state
            );
            return Ok(());
        }

        self.put(&f(job)).await
    }
}
