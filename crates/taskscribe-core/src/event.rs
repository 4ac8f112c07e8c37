//! Webhook event normalization and filtering.
//!
//! Two payload shapes announce new records: collection content updates, which
//! list changed children under `data.updated_blocks`, and page-lifecycle
//! events, which carry the page and its parent under `data`. [`normalize`]
//! reduces both to a single [`RecordsChanged`] so that [`EventFilter`] has one
//! rule to apply.

use tracing::debug;

use taskscribe_types::webhook::{
    ContentUpdatedData, EVENT_DATA_SOURCE_CONTENT_UPDATED, EVENT_DATABASE_CONTENT_UPDATED,
    EVENT_PAGE_CREATED, PageEventData, RecordsChanged, WebhookEvent, WebhookPayload,
};

/// Reduce a raw payload to the event the server acts on.
///
/// Never fails: anything unrecognized or malformed becomes
/// [`WebhookEvent::Unhandled`] with a reason suitable for logging.
pub fn normalize(payload: &WebhookPayload) -> WebhookEvent {
    if let Some(token) = &payload.verification_token {
        return WebhookEvent::Verification {
            token: token.clone(),
        };
    }

    match payload.event_type.as_deref() {
        Some(t @ (EVENT_DATA_SOURCE_CONTENT_UPDATED | EVENT_DATABASE_CONTENT_UPDATED)) => {
            normalize_content_updated(t, payload)
        }
        Some(EVENT_PAGE_CREATED) => normalize_page_created(payload),
        other => unhandled(other, "event type not handled"),
    }
}

fn normalize_content_updated(event_type: &str, payload: &WebhookPayload) -> WebhookEvent {
    let Some(entity) = &payload.entity else {
        return unhandled(Some(event_type), "event has no entity");
    };
    match entity.entity_type.as_deref() {
        Some("data_source" | "database") => {}
        _ => return unhandled(Some(event_type), "event entity is not a data source"),
    }
    let Some(collection_id) = entity.id.as_deref().filter(|id| !id.is_empty()) else {
        return unhandled(Some(event_type), "event entity has no id");
    };

    let data: ContentUpdatedData = match payload.data.clone().map(serde_json::from_value) {
        Some(Ok(data)) => data,
        Some(Err(e)) => {
            debug!(error = %e, "content update data did not match the expected shape");
            ContentUpdatedData::default()
        }
        None => ContentUpdatedData::default(),
    };

    // Children of a database are pages, but the event reports them as blocks.
    let record_ids = data
        .updated_blocks
        .into_iter()
        .filter(|block| block.block_type.as_deref() == Some("block"))
        .filter_map(|block| block.id)
        .filter(|id| is_workspace_id(id));

    WebhookEvent::RecordsChanged(RecordsChanged {
        event_type: event_type.to_string(),
        collection_id: collection_id.to_string(),
        record_ids: dedup_preserving_order(record_ids),
    })
}

fn normalize_page_created(payload: &WebhookPayload) -> WebhookEvent {
    let data: PageEventData = match payload.data.clone().map(serde_json::from_value) {
        Some(Ok(data)) => data,
        Some(Err(_)) => return unhandled(Some(EVENT_PAGE_CREATED), "page data is malformed"),
        None => PageEventData::default(),
    };

    let record_id = data
        .id
        .clone()
        .or_else(|| payload.entity.as_ref().and_then(|e| e.id.clone()))
        .filter(|id| !id.is_empty());
    let Some(record_id) = record_id else {
        return unhandled(Some(EVENT_PAGE_CREATED), "page event has no page id");
    };
    if !is_workspace_id(&record_id) {
        return unhandled(Some(EVENT_PAGE_CREATED), "page id is not a workspace id");
    }

    let Some(collection_id) = data
        .parent
        .as_ref()
        .and_then(|p| p.collection_id())
        .filter(|id| !id.is_empty())
    else {
        return unhandled(Some(EVENT_PAGE_CREATED), "page has no parent collection");
    };

    WebhookEvent::RecordsChanged(RecordsChanged {
        event_type: EVENT_PAGE_CREATED.to_string(),
        collection_id: collection_id.to_string(),
        record_ids: vec![record_id],
    })
}

fn unhandled(event_type: Option<&str>, reason: &str) -> WebhookEvent {
    WebhookEvent::Unhandled {
        event_type: event_type.map(str::to_string),
        reason: reason.to_string(),
    }
}

fn dedup_preserving_order(ids: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.filter(|id| seen.insert(id.clone())).collect()
}

/// Canonical form of a workspace id: separators removed, lowercase.
///
/// The API returns dashed UUIDs while copied URLs and settings often carry the
/// undashed form.
pub fn normalize_id(id: &str) -> String {
    id.chars()
        .filter(|c| *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether `id` is a workspace object id: 32 hex digits once normalized.
///
/// Record ids are interpolated into request paths, so anything else is
/// dropped before a job is scheduled.
pub fn is_workspace_id(id: &str) -> bool {
    let normalized = normalize_id(id);
    normalized.len() == 32 && normalized.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decides whether a normalized event concerns the tracked collection.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Normalized tracked collection id; `None` means nothing matches.
    collection_id: Option<String>,
}

impl EventFilter {
    pub fn new(collection_id: Option<&str>) -> Self {
        Self {
            collection_id: collection_id
                .map(normalize_id)
                .filter(|id| !id.is_empty()),
        }
    }

    /// Whether this filter has a collection to match against.
    pub fn is_configured(&self) -> bool {
        self.collection_id.is_some()
    }

    pub fn matches(&self, event: &RecordsChanged) -> bool {
        self.collection_id
            .as_deref()
            .is_some_and(|target| normalize_id(&event.collection_id) == target)
    }

    /// Record ids that should each get exactly one job, in payload order.
    pub fn select<'a>(&self, event: &'a WebhookEvent) -> &'a [String] {
        match event {
            WebhookEvent::RecordsChanged(changed) if self.matches(changed) => &changed.record_ids,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DB_DASHED: &str = "1a2b3c4d-5e6f-7a8b-9c0d-1e2f3a4b5c6d";
    const DB_PLAIN: &str = "1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d";
    const PAGE_1: &str = "29a1e2d3-4b5a-8078-8796-a5b4c3d2e1f0";
    const PAGE_2: &str = "29a1e2d3-4b5a-8078-8796-a5b4c3d2e1f1";
    const PAGE_9: &str = "29a1e2d3-4b5a-8078-8796-a5b4c3d2e1f9";

    fn payload(json: serde_json::Value) -> WebhookPayload {
        serde_json::from_value(json).unwrap()
    }

    fn content_updated(entity_id: &str, blocks: serde_json::Value) -> WebhookPayload {
        payload(serde_json::json!({
            "type": "data_source.content_updated",
            "entity": {"id": entity_id, "type": "data_source"},
            "data": {"updated_blocks": blocks}
        }))
    }

    fn page_created(page_id: &str, database_id: &str) -> WebhookPayload {
        payload(serde_json::json!({
            "type": "page.created",
            "data": {
                "object": "page",
                "id": page_id,
                "parent": {"type": "database_id", "database_id": database_id}
            }
        }))
    }

    // -------------------------------------------------------------------
    // normalize
    // -------------------------------------------------------------------

    #[test]
    fn test_verification_token_short_circuits() {
        let event = normalize(&payload(serde_json::json!({
            "verification_token": "secret_tok",
            "type": "page.created"
        })));
        assert_eq!(
            event,
            WebhookEvent::Verification {
                token: "secret_tok".to_string()
            }
        );
    }

    #[test]
    fn test_content_updated_collects_block_ids() {
        let event = normalize(&content_updated(
            DB_DASHED,
            serde_json::json!([
                {"id": PAGE_1, "type": "block"},
                {"id": PAGE_2, "type": "block"}
            ]),
        ));
        let WebhookEvent::RecordsChanged(changed) = event else {
            panic!("expected RecordsChanged");
        };
        assert_eq!(changed.collection_id, DB_DASHED);
        assert_eq!(changed.record_ids, vec![PAGE_1, PAGE_2]);
        assert_eq!(changed.event_type, "data_source.content_updated");
    }

    #[test]
    fn test_content_updated_skips_non_block_entries_and_duplicates() {
        let event = normalize(&content_updated(
            DB_DASHED,
            serde_json::json!([
                {"id": PAGE_1, "type": "block"},
                {"id": PAGE_1, "type": "block"},
                {"id": "prop", "type": "property"},
                {"type": "block"}
            ]),
        ));
        let WebhookEvent::RecordsChanged(changed) = event else {
            panic!("expected RecordsChanged");
        };
        assert_eq!(changed.record_ids, vec![PAGE_1]);
    }

    #[test]
    fn test_content_updated_with_wrong_entity_type_is_unhandled() {
        let event = normalize(&payload(serde_json::json!({
            "type": "data_source.content_updated",
            "entity": {"id": DB_DASHED, "type": "page"},
            "data": {"updated_blocks": [{"id": PAGE_1, "type": "block"}]}
        })));
        assert!(matches!(event, WebhookEvent::Unhandled { .. }));
    }

    #[test]
    fn test_database_content_updated_is_accepted() {
        let event = normalize(&payload(serde_json::json!({
            "type": "database.content_updated",
            "entity": {"id": DB_DASHED, "type": "database"},
            "data": {"updated_blocks": [{"id": PAGE_1, "type": "block"}]}
        })));
        assert!(matches!(event, WebhookEvent::RecordsChanged(_)));
    }

    #[test]
    fn test_page_created_uses_parent_database() {
        let event = normalize(&page_created(PAGE_9, DB_DASHED));
        assert_eq!(
            event,
            WebhookEvent::RecordsChanged(RecordsChanged {
                event_type: "page.created".to_string(),
                collection_id: DB_DASHED.to_string(),
                record_ids: vec![PAGE_9.to_string()],
            })
        );
    }

    #[test]
    fn test_page_created_falls_back_to_entity_id() {
        let event = normalize(&payload(serde_json::json!({
            "type": "page.created",
            "entity": {"id": PAGE_2, "type": "page"},
            "data": {"parent": {"id": DB_DASHED, "type": "data_source"}}
        })));
        let WebhookEvent::RecordsChanged(changed) = event else {
            panic!("expected RecordsChanged");
        };
        assert_eq!(changed.record_ids, vec![PAGE_2]);
        assert_eq!(changed.collection_id, DB_DASHED);
    }

    #[test]
    fn test_page_created_without_parent_is_unhandled() {
        let event = normalize(&payload(serde_json::json!({
            "type": "page.created",
            "data": {"id": PAGE_1}
        })));
        assert!(matches!(
            event,
            WebhookEvent::Unhandled { reason, .. } if reason == "page has no parent collection"
        ));
    }

    #[test]
    fn test_unknown_and_missing_types_are_unhandled() {
        let event = normalize(&payload(serde_json::json!({"type": "comment.created"})));
        assert!(matches!(
            event,
            WebhookEvent::Unhandled { event_type: Some(t), .. } if t == "comment.created"
        ));
        let event = normalize(&WebhookPayload::default());
        assert!(matches!(event, WebhookEvent::Unhandled { event_type: None, .. }));
    }

    #[test]
    fn test_record_ids_must_be_workspace_ids() {
        let event = normalize(&content_updated(
            DB_DASHED,
            serde_json::json!([
                {"id": "../users", "type": "block"},
                {"id": "page-1", "type": "block"},
                {"id": PAGE_1, "type": "block"}
            ]),
        ));
        let WebhookEvent::RecordsChanged(changed) = event else {
            panic!("expected RecordsChanged");
        };
        assert_eq!(changed.record_ids, vec![PAGE_1]);

        let event = normalize(&page_created("../users/me", DB_DASHED));
        assert!(matches!(
            event,
            WebhookEvent::Unhandled { reason, .. } if reason == "page id is not a workspace id"
        ));
    }

    #[test]
    fn test_is_workspace_id() {
        assert!(is_workspace_id(PAGE_1));
        assert!(is_workspace_id(DB_PLAIN));
        assert!(is_workspace_id(&DB_PLAIN.to_uppercase()));
        assert!(!is_workspace_id("rec-1"));
        assert!(!is_workspace_id("1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d/../x"));
        assert!(!is_workspace_id("1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6"));
        assert!(!is_workspace_id(""));
    }

    // -------------------------------------------------------------------
    // EventFilter
    // -------------------------------------------------------------------

    #[test]
    fn test_normalize_id_strips_dashes_and_case() {
        assert_eq!(normalize_id(DB_DASHED), DB_PLAIN);
        assert_eq!(normalize_id("AB-cd"), "abcd");
    }

    #[test]
    fn test_matching_collection_selects_exactly_one_record() {
        let filter = EventFilter::new(Some(DB_PLAIN));
        let event = normalize(&content_updated(
            DB_DASHED,
            serde_json::json!([{"id": PAGE_1, "type": "block"}]),
        ));
        assert_eq!(filter.select(&event), [PAGE_1.to_string()]);
    }

    #[test]
    fn test_non_matching_collection_selects_nothing() {
        let filter = EventFilter::new(Some(DB_PLAIN));
        let event = normalize(&content_updated(
            "ffffffff-5e6f-7a8b-9c0d-1e2f3a4b5c6d",
            serde_json::json!([{"id": PAGE_1, "type": "block"}]),
        ));
        assert!(filter.select(&event).is_empty());
    }

    #[test]
    fn test_page_created_matches_dashed_config() {
        let filter = EventFilter::new(Some(DB_DASHED));
        let event = normalize(&page_created(PAGE_9, DB_PLAIN));
        assert_eq!(filter.select(&event), [PAGE_9.to_string()]);
    }

    #[test]
    fn test_unconfigured_filter_matches_nothing() {
        let filter = EventFilter::new(None);
        assert!(!filter.is_configured());
        let event = normalize(&page_created(PAGE_9, DB_PLAIN));
        assert!(filter.select(&event).is_empty());

        assert!(!EventFilter::new(Some("--")).is_configured());
    }

    #[test]
    fn test_verification_and_unhandled_select_nothing() {
        let filter = EventFilter::new(Some(DB_PLAIN));
        let verification = WebhookEvent::Verification {
            token: "t".to_string(),
        };
        assert!(filter.select(&verification).is_empty());
        let unhandled = normalize(&payload(serde_json::json!({"type": "page.deleted"})));
        assert!(filter.select(&unhandled).is_empty());
    }
}
