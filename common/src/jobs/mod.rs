use serde::{Deserialize, Serialize};

/// Status of a background job as reported by `GET /api/promotion/status/{job_id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    /// Percentage of work done, `0..=100`.
    InProgress(u32),
    /// Human readable summary of the finished job.
    Completed(String),
    Failed(String),
}
