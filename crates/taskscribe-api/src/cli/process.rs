//! `taskscribe process` and `taskscribe backfill` -- run the pipeline in the
//! foreground without the server.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use taskscribe_core::date::SystemClock;
use taskscribe_core::event::is_workspace_id;
use taskscribe_core::queue::JobProcessor;
use taskscribe_core::workspace::Workspace;
use taskscribe_types::config::AppConfig;
use taskscribe_types::job::{JobCounts, JobStatus, TranscriptJob};

use crate::state::build_pipeline;

/// Process one record and print its outcome.
pub async fn process(config: &AppConfig, page_id: &str, json: bool) -> anyhow::Result<()> {
    anyhow::ensure!(is_workspace_id(page_id), "{page_id:?} is not a page id");
    let pipeline = build_pipeline(config, Arc::new(SystemClock::new(config.timezone)))?;
    let status = pipeline.process(&TranscriptJob::new(page_id, "cli")).await;
    print_status(page_id, &status, json);

    if let JobStatus::Failed { error } = status {
        anyhow::bail!("processing {page_id} failed: {error}");
    }
    Ok(())
}

/// Process records created after `since`, oldest first, one at a time.
pub async fn backfill(
    config: &AppConfig,
    since: DateTime<Utc>,
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    let database_id = config.require_database_id()?;
    let pipeline = build_pipeline(config, Arc::new(SystemClock::new(config.timezone)))?;

    let records = pipeline
        .workspace()
        .query_created_after(database_id, since, limit)
        .await?;
    tracing::info!(count = records.len(), %since, "backfilling records");

    let mut counts = JobCounts::default();
    for record in &records {
        let status = pipeline.process(&TranscriptJob::new(record.id.as_str(), "backfill")).await;
        counts.submitted += 1;
        match &status {
            JobStatus::Completed { .. } => counts.completed += 1,
            JobStatus::Skipped { .. } => counts.skipped += 1,
            JobStatus::Failed { .. } => counts.failed += 1,
        }
        print_status(&record.id, &status, json);
    }

    if json {
        println!("{}", serde_json::to_string(&counts)?);
    } else {
        println!(
            "{} records: {} completed, {} skipped, {} failed",
            counts.submitted, counts.completed, counts.skipped, counts.failed
        );
    }

    if counts.failed > 0 {
        anyhow::bail!("{} of {} records failed", counts.failed, counts.submitted);
    }
    Ok(())
}

fn print_status(record_id: &str, status: &JobStatus, json: bool) {
    if json {
        let line = serde_json::json!({ "record_id": record_id, "outcome": status });
        println!("{line}");
        return;
    }
    match status {
        JobStatus::Completed { title, url, .. } => {
            println!("{record_id}: created \"{title}\" {}", url.as_deref().unwrap_or(""));
        }
        JobStatus::Skipped { reason } => println!("{record_id}: skipped ({reason})"),
        JobStatus::Failed { error } => println!("{record_id}: failed ({error})"),
    }
}
