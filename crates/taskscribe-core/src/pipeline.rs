//! The transcript-to-page pipeline: fetch, extract, summarize, create.

use std::sync::Arc;

use tracing::{error, info, warn};

use taskscribe_types::config::ConfigError;
use taskscribe_types::job::{JobStatus, TranscriptJob};
use taskscribe_types::page::{CreatedPage, WorkspaceError};

use crate::date::{Clock, DateStamp};
use crate::llm::provider::LlmProvider;
use crate::page::create_task_page;
use crate::queue::{JobFuture, JobProcessor};
use crate::summarize::{SummarizeError, Summarizer};
use crate::transcript::extract_transcript_text;
use crate::workspace::Workspace;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to retrieve record {record_id}")]
    Retrieve {
        record_id: String,
        #[source]
        source: WorkspaceError,
    },

    #[error("failed to summarize transcript")]
    Summarize(#[from] SummarizeError),

    #[error("failed to create summary page")]
    CreatePage(#[source] WorkspaceError),
}

/// What processing one record produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Created { page: CreatedPage, title: String },
    /// The record has no transcript text.
    NoTranscript,
}

/// Turns one record id into one summary page.
pub struct TranscriptPipeline<W: Workspace, P: LlmProvider> {
    workspace: Arc<W>,
    summarizer: Summarizer<P>,
    clock: Arc<dyn Clock>,
    parent_page_id: Option<String>,
}

impl<W: Workspace, P: LlmProvider> TranscriptPipeline<W, P> {
    pub fn new(
        workspace: Arc<W>,
        summarizer: Summarizer<P>,
        clock: Arc<dyn Clock>,
        parent_page_id: Option<String>,
    ) -> Self {
        Self {
            workspace,
            summarizer,
            clock,
            parent_page_id,
        }
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    /// Process one record end to end.
    ///
    /// The model's `page_title` is always replaced by today's date stamp.
    /// Nothing is retried; the first failing step ends the run.
    pub async fn run(&self, record_id: &str) -> Result<ProcessOutcome, PipelineError> {
        let parent = self
            .parent_page_id
            .as_deref()
            .ok_or(ConfigError::Missing("NOTION_PARENT_PAGE_ID"))?;

        let page = self
            .workspace
            .retrieve_page(record_id)
            .await
            .map_err(|source| PipelineError::Retrieve {
                record_id: record_id.to_string(),
                source,
            })?;

        let transcript = extract_transcript_text(&page);
        if transcript.is_empty() {
            warn!(record_id, "record has no transcript text");
            return Ok(ProcessOutcome::NoTranscript);
        }
        info!(record_id, chars = transcript.chars().count(), "transcript extracted");

        let stamp = DateStamp::today(self.clock.as_ref());
        let mut output = self
            .summarizer
            .summarize(&transcript, &stamp.prompt_date)
            .await?;
        output.page_title = stamp.page_title;

        let created = create_task_page(self.workspace.as_ref(), parent, &output)
            .await
            .map_err(PipelineError::CreatePage)?;

        info!(
            record_id,
            page_id = %created.id,
            url = created.url.as_deref().unwrap_or(""),
            title = %output.page_title,
            "summary page created"
        );

        Ok(ProcessOutcome::Created {
            page: created,
            title: output.page_title,
        })
    }
}

impl<W, P> JobProcessor for TranscriptPipeline<W, P>
where
    W: Workspace + 'static,
    P: LlmProvider + 'static,
{
    fn process<'a>(&'a self, job: &'a TranscriptJob) -> JobFuture<'a> {
        Box::pin(async move {
            match self.run(&job.record_id).await {
                Ok(ProcessOutcome::Created { page, title }) => JobStatus::Completed {
                    page_id: page.id,
                    url: page.url,
                    title,
                },
                Ok(ProcessOutcome::NoTranscript) => JobStatus::Skipped {
                    reason: "no transcript text".to_string(),
                },
                Err(e) => {
                    let chain = error_chain(&e);
                    error!(error = %chain, "transcript processing failed");
                    JobStatus::Failed { error: chain }
                }
            }
        })
    }
}

/// Render an error and all of its sources as `outer: inner: root`.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
