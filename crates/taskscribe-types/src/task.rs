//! Structured output returned by the summarization model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The three-field reply the model is constrained to.
///
/// The schema generated from this type (via `schemars`) is sent with every
/// summarization request, so field names and descriptions here are part of
/// the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaskListOutput {
    /// Format: 'DayOfWeek [MM/DD/YY]' e.g. 'Sunday [10/27/25]'
    pub page_title: String,
    /// 2-3 sentences summarizing the overall context
    pub summary: String,
    /// Complete markdown-formatted checklist using '- [ ]' syntax
    pub tasks: String,
}
