//! Notion REST API wire shapes.
//!
//! Request bodies are assembled as JSON values because the block and property
//! objects are keyed by their own type name (`{"type": "to_do", "to_do": {...}}`),
//! which does not map cleanly onto a derived struct.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use taskscribe_types::page::{ContentBlock, NewPage, Page};

/// Notion caps `page_size` on list and query endpoints.
pub const MAX_PAGE_SIZE: usize = 100;

/// A single plain-text rich text run.
fn text_run(content: &str) -> Value {
    json!({"type": "text", "text": {"content": content}})
}

/// Render a [`ContentBlock`] as a Notion block object.
pub fn block_json(block: &ContentBlock) -> Value {
    let (block_type, body) = match block {
        ContentBlock::Heading { level, text } => {
            (level.block_type(), json!({"rich_text": [text_run(text)]}))
        }
        ContentBlock::Paragraph { text } => ("paragraph", json!({"rich_text": [text_run(text)]})),
        ContentBlock::ToDo { text, checked } => (
            "to_do",
            json!({"rich_text": [text_run(text)], "checked": checked}),
        ),
    };
    json!({"object": "block", "type": block_type, block_type: body})
}

/// Body for `POST /v1/pages`.
pub fn create_page_body(page: &NewPage) -> Value {
    json!({
        "parent": {"page_id": page.parent_page_id},
        "properties": {
            "title": {"title": [text_run(&page.title)]}
        },
        "children": page.children.iter().map(block_json).collect::<Vec<_>>(),
    })
}

/// Body for `POST /v1/databases/{id}/query`: records created strictly after
/// `after`, oldest first.
pub fn created_after_query(
    after: DateTime<Utc>,
    page_size: usize,
    start_cursor: Option<&str>,
) -> Value {
    let mut body = json!({
        "filter": {
            "timestamp": "created_time",
            "created_time": {"after": after.to_rfc3339_opts(SecondsFormat::Millis, true)}
        },
        "sorts": [{"timestamp": "created_time", "direction": "ascending"}],
        "page_size": page_size.clamp(1, MAX_PAGE_SIZE),
    });
    if let (Some(cursor), Some(map)) = (start_cursor, body.as_object_mut()) {
        map.insert("start_cursor".to_string(), json!(cursor));
    }
    body
}

/// One page of database query results.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct NotionErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use taskscribe_types::page::HeadingLevel;

    use super::*;

    #[test]
    fn test_todo_block_shape() {
        assert_eq!(
            block_json(&ContentBlock::todo("Call bank")),
            json!({
                "object": "block",
                "type": "to_do",
                "to_do": {
                    "rich_text": [{"type": "text", "text": {"content": "Call bank"}}],
                    "checked": false
                }
            })
        );
    }

    #[test]
    fn test_heading_and_paragraph_shapes() {
        let heading = block_json(&ContentBlock::heading(HeadingLevel::H2, "Summary"));
        assert_eq!(heading["type"], "heading_2");
        assert_eq!(heading["heading_2"]["rich_text"][0]["text"]["content"], "Summary");

        let para = block_json(&ContentBlock::paragraph("Errands."));
        assert_eq!(para["type"], "paragraph");
        assert_eq!(para["paragraph"]["rich_text"][0]["text"]["content"], "Errands.");
        assert!(para["paragraph"].get("checked").is_none());
    }

    #[test]
    fn test_create_page_body() {
        let page = NewPage {
            parent_page_id: "parent-1".to_string(),
            title: "Tuesday [10/28/25]".to_string(),
            children: vec![
                ContentBlock::heading(HeadingLevel::H2, "Summary"),
                ContentBlock::todo("Call bank"),
            ],
        };
        let body = create_page_body(&page);
        assert_eq!(body["parent"]["page_id"], "parent-1");
        assert_eq!(
            body["properties"]["title"]["title"][0]["text"]["content"],
            "Tuesday [10/28/25]"
        );
        let children = body["children"].as_array().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1]["type"], "to_do");
    }

    #[test]
    fn test_created_after_query() {
        let after = Utc.with_ymd_and_hms(2025, 10, 28, 9, 30, 0).unwrap();
        let body = created_after_query(after, 500, None);
        assert_eq!(body["filter"]["timestamp"], "created_time");
        assert_eq!(body["filter"]["created_time"]["after"], "2025-10-28T09:30:00.000Z");
        assert_eq!(body["sorts"][0]["direction"], "ascending");
        assert_eq!(body["page_size"], 100);
        assert!(body.get("start_cursor").is_none());

        let next = created_after_query(after, 5, Some("cursor-2"));
        assert_eq!(next["page_size"], 5);
        assert_eq!(next["start_cursor"], "cursor-2");
    }
}
