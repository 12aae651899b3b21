//! Display helpers for the review screen.

use common::jobs::JobStatus;
use common::model::submission::Submission;

/// Answer keys shown as columns in the listing.
pub const SUMMARY_KEYS: [&str; 3] = ["student_name", "student_mobile", "course"];

pub fn summary_value<'a>(submission: &'a Submission, key: &str) -> &'a str {
    submission.value(key).unwrap_or("-")
}

/// First eight characters of an id, enough to tell rows apart.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Answers in key order so the detail panel is stable between renders.
pub fn sorted_answers(submission: &Submission) -> Vec<(&str, &str)> {
    let mut answers: Vec<(&str, &str)> = submission
        .data
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    answers.sort_unstable_by(|a, b| a.0.cmp(b.0));
    answers
}

pub fn job_label(status: &JobStatus) -> String {
    match status {
        JobStatus::Pending => "Queued".to_string(),
        JobStatus::InProgress(percent) => format!("Promoting... {}%", percent),
        JobStatus::Completed(summary) => format!("Done: {}", summary),
        JobStatus::Failed(reason) => format!("Failed: {}", reason),
    }
}

pub fn is_finished(status: &JobStatus) -> bool {
    matches!(status, JobStatus::Completed(_) | JobStatus::Failed(_))
}
