//! Background job records: what gets enqueued and how it ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One unit of background work: summarize a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptJob {
    pub id: Uuid,
    /// Workspace id of the record whose transcript should be processed.
    pub record_id: String,
    /// What caused the job (`page.created`, `cli`, ...), for logs.
    pub trigger: String,
    pub enqueued_at: DateTime<Utc>,
}

impl TranscriptJob {
    pub fn new(record_id: impl Into<String>, trigger: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            record_id: record_id.into(),
            trigger: trigger.into(),
            enqueued_at: Utc::now(),
        }
    }
}

/// Terminal state of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    /// A summary page was created.
    Completed {
        page_id: String,
        url: Option<String>,
        title: String,
    },
    /// Nothing to do (e.g. the record has no transcript text).
    Skipped { reason: String },
    /// A remote call or configuration lookup failed.
    Failed { error: String },
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Completed { .. } => "completed",
            JobStatus::Skipped { .. } => "skipped",
            JobStatus::Failed { .. } => "failed",
        }
    }
}

/// Published once per job when it finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub job_id: Uuid,
    pub record_id: String,
    #[serde(flatten)]
    pub status: JobStatus,
    pub finished_at: DateTime<Utc>,
}

/// Point-in-time job counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCounts {
    pub submitted: u64,
    pub completed: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl JobCounts {
    /// Jobs submitted but not yet finished.
    pub fn in_flight(&self) -> u64 {
        self.submitted
            .saturating_sub(self.completed + self.skipped + self.failed)
    }
}
