//! Transcript text extraction from a retrieved record.

use taskscribe_types::page::{Page, PropertyValue, RichTextRun};

/// Name of the property holding the transcript.
pub const TRANSCRIPT_PROPERTY: &str = "Transcript";

/// Concatenate the plain text of the page's `Transcript` property.
///
/// Returns an empty string when the property is missing or is neither a
/// rich-text nor a title property; callers treat empty as "nothing to do".
pub fn extract_transcript_text(page: &Page) -> String {
    match page.properties.get(TRANSCRIPT_PROPERTY) {
        Some(PropertyValue::RichText { rich_text }) => concat_runs(rich_text),
        Some(PropertyValue::Title { title }) => concat_runs(title),
        Some(PropertyValue::Other) | None => String::new(),
    }
}

fn concat_runs(runs: &[RichTextRun]) -> String {
    runs.iter().map(|run| run.plain_text.as_str()).collect()
}
