//! Transcript summarization through a structured-output LLM call.
//!
//! `Summarizer` sends the transcript with a fixed instruction prompt and a
//! JSON schema generated from [`TaskListOutput`]; the reply is parsed straight
//! into that type. A reply that does not parse is a hard failure -- there is no
//! repair or retry loop.

use tracing::{Instrument, info_span};

use taskscribe_types::llm::{
    CompletionRequest, LlmError, Message, MessageRole, OutputConfig,
    add_additional_properties_false,
};
use taskscribe_types::task::TaskListOutput;

use crate::llm::provider::LlmProvider;

/// Name of the structured output schema sent to the provider.
pub const OUTPUT_SCHEMA_NAME: &str = "task_list_output";

/// Instruction prompt for turning a voice transcript into a task page.
pub const SYSTEM_PROMPT: &str = r#"You are an expert at converting voice transcripts into actionable Notion task lists.

Analyze the transcript I provide and create a Notion-compatible document with this exact structure:

Structure Requirements:

Summary
* Write 2-3 sentences summarizing the overall context and what I'm working on
* Focus on the main objective or project

Tasks
* Create a checklist of all actionable tasks from the transcript
* Format as Notion checkboxes using `- [ ]` syntax
* Keep each task concise but specific (1-2 lines maximum)
* Indent sub-tasks under main tasks using tab indentation
* Preserve logical groupings and dependencies
* Order tasks by priority or natural sequence when clear from context

Guidelines:
* Extract every actionable item mentioned
* Add necessary detail for clarity without being verbose
* Use clear, action-oriented language (start with verbs)
* If a task has multiple steps, break it into a main task with indented sub-tasks
* Ensure the output renders correctly in Notion's markdown format"#;

/// Errors from the summarization step.
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("reply did not match the task list schema: {message}")]
    Parse { message: String, raw: String },
}

/// JSON schema for [`TaskListOutput`], closed to extra properties.
pub fn task_list_schema() -> serde_json::Value {
    let mut schema = match serde_json::to_value(schemars::schema_for!(TaskListOutput)) {
        Ok(value) => value,
        Err(_) => serde_json::json!({}),
    };
    if let Some(map) = schema.as_object_mut() {
        map.remove("$schema");
    }
    add_additional_properties_false(&mut schema);
    schema
}

/// The user turn: the current date followed by the transcript.
pub fn user_message(transcript: &str, current_date: &str) -> String {
    format!("Current date: {current_date}\n\nTranscript:\n{transcript}")
}

/// Turns transcripts into [`TaskListOutput`] via an [`LlmProvider`].
pub struct Summarizer<P: LlmProvider> {
    provider: P,
    model: String,
    max_tokens: u32,
}

impl<P: LlmProvider> Summarizer<P> {
    pub fn new(provider: P, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
        }
    }

    #[cfg(test)]
    pub(crate) fn provider(&self) -> &P {
        &self.provider
    }

    /// Assemble the completion request for one transcript.
    pub fn build_request(&self, transcript: &str, current_date: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: user_message(transcript, current_date),
            }],
            system: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: self.max_tokens,
            temperature: None,
            output_config: Some(OutputConfig::json_schema(
                OUTPUT_SCHEMA_NAME,
                task_list_schema(),
            )),
        }
    }

    /// Summarize `transcript`, telling the model today is `current_date`.
    pub async fn summarize(
        &self,
        transcript: &str,
        current_date: &str,
    ) -> Result<TaskListOutput, SummarizeError> {
        let request = self.build_request(transcript, current_date);

        let span = info_span!(
            "gen_ai.summarize_transcript",
            gen_ai.operation.name = "chat",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            transcript_chars = transcript.chars().count(),
        );

        let response = self.provider.complete(&request).instrument(span).await?;

        tracing::debug!(
            response_id = %response.id,
            stop_reason = %response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "summarization reply received"
        );

        serde_json::from_str::<TaskListOutput>(&response.content).map_err(|e| {
            SummarizeError::Parse {
                message: e.to_string(),
                raw: response.content,
            }
        })
    }
}
