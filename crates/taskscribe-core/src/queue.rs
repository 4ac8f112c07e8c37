//! In-process job queue for fire-and-forget transcript processing.
//!
//! Webhook handlers enqueue a [`TranscriptJob`] and return immediately. A
//! dispatcher task spawns one tokio task per job, so jobs run concurrently and
//! a slow remote call only stalls its own job. Each job ends in exactly one
//! [`JobOutcome`], which is counted in [`JobStats`] and published on a
//! broadcast channel; subscribing is how tests and operators observe results.
//!
//! The queue is not durable: jobs still in flight when the process exits are
//! lost.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use taskscribe_types::job::{JobCounts, JobOutcome, JobStatus, TranscriptJob};

/// Capacity of the outcome broadcast channel. Lagging subscribers miss the
/// oldest outcomes; the counters stay exact.
const OUTCOME_BUFFER: usize = 256;

/// Boxed future returned by [`JobProcessor::process`].
pub type JobFuture<'a> = Pin<Box<dyn Future<Output = JobStatus> + Send + 'a>>;

/// Runs one job to its terminal status.
///
/// Object-safe so the queue can hold any processor behind `Arc<dyn _>`.
/// Implementations must not panic on remote failures; they report them as
/// [`JobStatus::Failed`].
pub trait JobProcessor: Send + Sync + 'static {
    fn process<'a>(&'a self, job: &'a TranscriptJob) -> JobFuture<'a>;
}

/// Errors from enqueueing.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("job queue is closed")]
    Closed,
}

/// Lock-free job counters shared by the queue and its workers.
#[derive(Debug, Default)]
pub struct JobStats {
    submitted: AtomicU64,
    completed: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl JobStats {
    fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    fn record(&self, status: &JobStatus) {
        let counter = match status {
            JobStatus::Completed { .. } => &self.completed,
            JobStatus::Skipped { .. } => &self.skipped,
            JobStatus::Failed { .. } => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> JobCounts {
        JobCounts {
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Handle for submitting jobs. Cheap to clone; the dispatcher stops once every
/// clone is dropped and the remaining jobs have finished.
#[derive(Clone)]
pub struct JobQueue {
    sender: mpsc::UnboundedSender<TranscriptJob>,
    outcomes: broadcast::Sender<JobOutcome>,
    stats: Arc<JobStats>,
}

impl JobQueue {
    /// Spawn the dispatcher on the current runtime.
    ///
    /// The returned handle resolves after the last queue handle is dropped and
    /// all in-flight jobs have finished.
    pub fn start(processor: Arc<dyn JobProcessor>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (outcomes, _) = broadcast::channel(OUTCOME_BUFFER);
        let stats = Arc::new(JobStats::default());

        let dispatcher = tokio::spawn(dispatch(
            receiver,
            processor,
            outcomes.clone(),
            Arc::clone(&stats),
        ));

        (
            Self {
                sender,
                outcomes,
                stats,
            },
            dispatcher,
        )
    }

    /// Submit a job; returns its id.
    pub fn enqueue(&self, job: TranscriptJob) -> Result<Uuid, QueueError> {
        let id = job.id;
        self.sender.send(job).map_err(|_| QueueError::Closed)?;
        self.stats.record_submitted();
        Ok(id)
    }

    /// Receive every outcome published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<JobOutcome> {
        self.outcomes.subscribe()
    }

    pub fn counts(&self) -> JobCounts {
        self.stats.snapshot()
    }
}

impl std::fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobQueue")
            .field("counts", &self.counts())
            .field("subscribers", &self.outcomes.receiver_count())
            .finish()
    }
}

async fn dispatch(
    mut receiver: mpsc::UnboundedReceiver<TranscriptJob>,
    processor: Arc<dyn JobProcessor>,
    outcomes: broadcast::Sender<JobOutcome>,
    stats: Arc<JobStats>,
) {
    let mut running = JoinSet::new();

    loop {
        tokio::select! {
            next = receiver.recv() => {
                let Some(job) = next else { break };
                let span = info_span!(
                    "job",
                    job_id = %job.id,
                    record_id = %job.record_id,
                    trigger = %job.trigger,
                );
                running.spawn(
                    run_job(job, Arc::clone(&processor), outcomes.clone(), Arc::clone(&stats))
                        .instrument(span),
                );
            }
            Some(joined) = running.join_next(), if !running.is_empty() => {
                log_join_error(joined);
            }
        }
    }

    while let Some(joined) = running.join_next().await {
        log_join_error(joined);
    }
    info!("job queue drained");
}

async fn run_job(
    job: TranscriptJob,
    processor: Arc<dyn JobProcessor>,
    outcomes: broadcast::Sender<JobOutcome>,
    stats: Arc<JobStats>,
) {
    info!("job started");
    let status = processor.process(&job).await;
    stats.record(&status);
    info!(status = status.as_str(), "job finished");

    // No subscribers is the normal case in production.
    let _ = outcomes.send(JobOutcome {
        job_id: job.id,
        record_id: job.record_id,
        status,
        finished_at: Utc::now(),
    });
}

fn log_join_error(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "job task panicked or was cancelled");
    }
}
