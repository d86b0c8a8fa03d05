//! Redis-backed queue integration tests.
//!
//! These run against a live Redis and are ignored by default.

use imgpipe_models::{JobState, Operation};
use imgpipe_queue::{JobQueue, JobStore, TransformJob};

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_redis_connection() {
    dotenvy::dotenv().ok();

    let queue = JobQueue::from_env().expect("Failed to create queue");
    queue.init().await.expect("Failed to initialize queue");

    let len = queue.len().await.expect("Failed to get queue length");
    println!("Queue length: {}", len);
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_job_enqueue_consume_ack() {
    dotenvy::dotenv().ok();

    let queue = JobQueue::from_env().expect("Failed to create queue");
    queue.init().await.expect("Failed to initialize queue");

    let job = TransformJob::new("test.jpg", vec![Operation::Resize { size: [100, 100] }]);
    let job_id = job.job_id.clone();

    let message_id = queue.enqueue(&job).await.expect("Failed to enqueue");
    println!("Enqueued job {} with message ID {}", job_id, message_id);

    let jobs = queue
        .consume("test-consumer", 1000, 1)
        .await
        .expect("Failed to consume");

    assert_eq!(jobs.len(), 1);
    let (msg_id, consumed) = &jobs[0];
    assert_eq!(consumed.job_id, job_id);
    assert_eq!(consumed.source_key, "test.jpg");

    queue.ack(msg_id).await.expect("Failed to ack");
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_job_store_lifecycle() {
    use imgpipe_models::{Job, JobId};

    dotenvy::dotenv().ok();

    let store = JobStore::from_env().expect("Failed to create job store");

    let job = Job::new(JobId::new(), "test.jpg", vec![]);
    let id = job.id.clone();
    store.put(&job).await.expect("Failed to store record");

    let fetched = store.fetch(&id).await.expect("fetch").expect("record exists");
    assert_eq!(fetched.state, JobState::Queued);

    store.mark_running(&id).await.expect("mark running");
    let fetched = store.fetch(&id).await.expect("fetch").unwrap();
    assert_eq!(fetched.state, JobState::Running);

    store
        .mark_finished(&id, "processed_test.jpg")
        .await
        .expect("mark finished");
    let fetched = store.fetch(&id).await.expect("fetch").unwrap();
    assert_eq!(fetched.state, JobState::Finished);
    assert_eq!(fetched.result_key.as_deref(), Some("processed_test.jpg"));

    // Terminal records do not rewind on a late transition
    store.mark_failed(&id, "late failure").await.expect("mark failed");
    let fetched = store.fetch(&id).await.expect("fetch").unwrap();
    assert_eq!(fetched.state, JobState::Finished);
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_fetch_unknown_job_is_none() {
    use imgpipe_models::JobId;

    dotenvy::dotenv().ok();

    let store = JobStore::from_env().expect("Failed to create job store");
    let missing = store
        .fetch(&JobId::from_string("no-such-job"))
        .await
        .expect("fetch should not error");
    assert!(missing.is_none());
}
