//! Application state wiring the pipeline, job queue and event filter together.
//!
//! The pipeline is generic over the workspace and LLM provider traits;
//! `ConcretePipeline` pins it to the Notion and Anthropic clients.

use std::sync::Arc;

use tokio::task::JoinHandle;

use taskscribe_core::date::Clock;
use taskscribe_core::event::EventFilter;
use taskscribe_core::pipeline::TranscriptPipeline;
use taskscribe_core::queue::{JobFuture, JobProcessor, JobQueue};
use taskscribe_core::summarize::Summarizer;
use taskscribe_infra::llm::anthropic::AnthropicProvider;
use taskscribe_infra::notion::NotionClient;
use taskscribe_types::config::AppConfig;
use taskscribe_types::job::{JobStatus, TranscriptJob};

use secrecy::{ExposeSecret, SecretString};

/// Concrete type alias for the pipeline pinned to infra implementations.
pub type ConcretePipeline = TranscriptPipeline<NotionClient, AnthropicProvider>;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub filter: Arc<EventFilter>,
    pub jobs: JobQueue,
}

impl AppState {
    /// State over an already running queue.
    pub fn new(config: Arc<AppConfig>, jobs: JobQueue) -> Self {
        let filter = EventFilter::new(config.database_id.as_deref());
        Self {
            config,
            filter: Arc::new(filter),
            jobs,
        }
    }

    /// Build the pipeline from `config` and start the job queue on it.
    ///
    /// Missing credentials do not prevent startup: jobs then fail with the
    /// configuration error instead.
    pub fn init(config: AppConfig, clock: Arc<dyn Clock>) -> (Self, JoinHandle<()>) {
        let processor: Arc<dyn JobProcessor> = match build_pipeline(&config, clock) {
            Ok(pipeline) => Arc::new(pipeline),
            Err(e) => {
                tracing::warn!(error = %e, "pipeline unavailable, jobs will fail until configured");
                Arc::new(Unconfigured {
                    reason: e.to_string(),
                })
            }
        };
        let (jobs, dispatcher) = JobQueue::start(processor);
        (Self::new(Arc::new(config), jobs), dispatcher)
    }
}

/// Wire the Notion and Anthropic clients into a pipeline.
pub fn build_pipeline(config: &AppConfig, clock: Arc<dyn Clock>) -> anyhow::Result<ConcretePipeline> {
    let notion_token = config.require_notion_token()?;
    let anthropic_key = config.require_anthropic_api_key()?;

    let notion = NotionClient::new(SecretString::from(notion_token.expose_secret()))?
        .with_base_url(config.notion_base_url.as_str());
    let anthropic = AnthropicProvider::new(SecretString::from(anthropic_key.expose_secret()))?
        .with_base_url(config.anthropic_base_url.as_str());

    let summarizer = Summarizer::new(
        anthropic,
        config.anthropic_model.as_str(),
        config.anthropic_max_tokens,
    );

    Ok(TranscriptPipeline::new(
        Arc::new(notion),
        summarizer,
        clock,
        config.parent_page_id.clone(),
    ))
}

/// Stand-in processor used when the pipeline cannot be built.
struct Unconfigured {
    reason: String,
}

impl JobProcessor for Unconfigured {
    fn process<'a>(&'a self, _job: &'a TranscriptJob) -> JobFuture<'a> {
        Box::pin(async move {
            tracing::error!(error = %self.reason, "cannot process job");
            JobStatus::Failed {
                error: self.reason.clone(),
            }
        })
    }
}
