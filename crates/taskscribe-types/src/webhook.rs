//! Inbound webhook payload shapes and the normalized event they reduce to.
//!
//! The raw structs mirror what the workspace sends and are deliberately
//! lenient (every field optional) so that irrelevant or unfamiliar deliveries
//! still parse and can be acknowledged as no-ops.

use serde::{Deserialize, Serialize};

/// Event type emitted when rows in a data source change.
pub const EVENT_DATA_SOURCE_CONTENT_UPDATED: &str = "data_source.content_updated";

/// Legacy event type emitted when rows in a database change.
pub const EVENT_DATABASE_CONTENT_UPDATED: &str = "database.content_updated";

/// Event type emitted when a page is created.
pub const EVENT_PAGE_CREATED: &str = "page.created";

/// Top-level webhook body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    /// Present only on the one-time verification handshake.
    #[serde(default)]
    pub verification_token: Option<String>,
    #[serde(default)]
    pub entity: Option<EntityRef>,
    /// Shape depends on `event_type`; decoded lazily.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// The object an event is about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub entity_type: Option<String>,
}

/// `data` of a collection content-update event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentUpdatedData {
    #[serde(default)]
    pub updated_blocks: Vec<UpdatedBlock>,
}

/// One changed child of a collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatedBlock {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub block_type: Option<String>,
}

/// `data` of a page-lifecycle event: the page itself, or enough of it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageEventData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub parent: Option<ParentRef>,
}

/// A page's parent reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentRef {
    #[serde(rename = "type", default)]
    pub parent_type: Option<String>,
    #[serde(default)]
    pub database_id: Option<String>,
    #[serde(default)]
    pub data_source_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl ParentRef {
    /// The containing collection's id, preferring the most specific field.
    pub fn collection_id(&self) -> Option<&str> {
        self.database_id
            .as_deref()
            .or(self.data_source_id.as_deref())
            .or(self.id.as_deref())
    }
}

/// A webhook body reduced to what the server acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WebhookEvent {
    /// One-time endpoint ownership handshake.
    Verification { token: String },
    /// One or more records in a collection changed.
    RecordsChanged(RecordsChanged),
    /// Anything else; acknowledged and dropped.
    Unhandled {
        event_type: Option<String>,
        reason: String,
    },
}

/// The single internal shape both supported event kinds normalize into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordsChanged {
    pub event_type: String,
    pub collection_id: String,
    pub record_ids: Vec<String>,
}
