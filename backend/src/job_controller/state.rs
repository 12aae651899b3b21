//! Shared state of background jobs.
//!
//! - `JobsState`: clonable map of job id to `JobStatus`, injected as `web::Data` in
//!   `main.rs` and read by `GET /api/promotion/status/{job_id}`.
//! - `JobUpdate`: a status change sent by a running job.
//! - `start_job_updater`: the single task that applies `JobUpdate`s to the map, so
//!   workers never take the write lock themselves. Jobs that finished more than
//!   `FINISHED_JOB_TTL` ago are dropped whenever the map is written.

use common::jobs::JobStatus;
use std::time::{Duration, Instant};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Capacity of the update channel between workers and the updater task.
pub const UPDATE_CHANNEL_CAPACITY: usize = 100;

/// How long a completed or failed job stays queryable.
pub const FINISHED_JOB_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
pub(crate) struct JobEntry {
    status: JobStatus,
    finished_at: Option<Instant>,
}

impl JobEntry {
    fn new(status: JobStatus, now: Instant) -> Self {
        let finished_at = matches!(status, JobStatus::Completed(_) | JobStatus::Failed(_)).then_some(now);
        Self { status, finished_at }
    }
}

#[derive(Clone)]
pub struct JobsState {
    /// Job id to its latest status. Written only by `start_job_updater` once a job
    /// has been registered.
    pub(crate) jobs: Arc<RwLock<HashMap<String, JobEntry>>>,

    /// Workers push their progress here.
    pub tx: mpsc::Sender<JobUpdate>,
}

impl JobsState {
    /// An empty state and the receiver to hand to `start_job_updater`.
    pub fn new() -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        (
            Self {
                jobs: Arc::new(RwLock::new(HashMap::new())),
                tx,
            },
            rx,
        )
    }

    pub async fn register(&self, job_id: &str) {
        let now = Instant::now();
        let mut jobs = self.jobs.write().await;
        prune_finished(&mut jobs, now);
        jobs.insert(job_id.to_string(), JobEntry::new(JobStatus::Pending, now));
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).map(|entry| entry.status.clone())
    }
}

/// Drops jobs that finished more than `FINISHED_JOB_TTL` before `now`.
fn prune_finished(jobs: &mut HashMap<String, JobEntry>, now: Instant) {
    jobs.retain(|_, entry| {
        entry
            .finished_at
            .is_none_or(|at| now.saturating_duration_since(at) <= FINISHED_JOB_TTL)
    });
}

#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

/// Applies updates until every sender is dropped. Spawned once from `main.rs`.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let now = Instant::now();
        let mut jobs = state.jobs.write().await;
        prune_finished(&mut jobs, now);
        jobs.insert(update.job_id, JobEntry::new(update.status, now));
    }
}
