//! Application state.

use std::sync::Arc;

use imgpipe_queue::{JobQueue, JobStore};
use imgpipe_storage::{PublicUrls, R2Client};

use crate::config::ApiConfig;

/// Shared application state.
///
/// Clients are constructed once at startup and shared by reference into
/// every handler; the queue and blob store are the only shared mutable
/// resources.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub storage: Arc<R2Client>,
    pub queue: Arc<JobQueue>,
    pub jobs: Arc<JobStore>,
    pub urls: PublicUrls,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let storage = R2Client::from_env().await?;
        let queue = JobQueue::from_env()?;
        let jobs = JobStore::from_env()?;
        let urls = PublicUrls::from_env()?;

        Ok(Self {
            config,
            storage: Arc::new(storage),
            queue: Arc::new(queue),
            jobs: Arc::new(jobs),
            urls,
        })
    }
}
