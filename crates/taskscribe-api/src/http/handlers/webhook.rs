//! Webhook receiver.
//!
//! Verifies the delivery signature over the raw body, normalizes the payload
//! into a [`WebhookEvent`], and enqueues one transcript job per selected
//! record. Every authenticated, well-formed delivery is acknowledged with
//! `{"received": true}`; processing happens after the response.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::{Value, json};

use taskscribe_core::event::normalize;
use taskscribe_infra::webhook::{SIGNATURE_HEADER, verify_signature};
use taskscribe_types::job::TranscriptJob;
use taskscribe_types::webhook::{WebhookEvent, WebhookPayload};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /webhook - Receive a workspace event.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    if !verify_signature(state.config.webhook_secret.as_ref(), &body, signature) {
        tracing::warn!(
            signature_present = signature.is_some(),
            body_bytes = body.len(),
            "rejected webhook with invalid signature"
        );
        return Err(AppError::InvalidSignature);
    }

    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    // Valid JSON of an unexpected shape is acknowledged and dropped.
    let payload: WebhookPayload = match serde_json::from_value(raw) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::info!(error = %e, "ignoring webhook payload of unexpected shape");
            return Ok(received());
        }
    };

    let event = normalize(&payload);
    match &event {
        WebhookEvent::Verification { token } => {
            // Operators paste this into the integration settings to finish
            // subscribing the endpoint.
            tracing::info!(verification_token = %token, "received webhook verification token");
        }
        WebhookEvent::Unhandled { event_type, reason } => {
            tracing::debug!(event_type = event_type.as_deref().unwrap_or(""), reason = %reason, "ignoring webhook event");
        }
        WebhookEvent::RecordsChanged(changed) => {
            let selected = state.filter.select(&event);
            if selected.is_empty() {
                tracing::info!(
                    event_type = %changed.event_type,
                    collection_id = %changed.collection_id,
                    configured = state.filter.is_configured(),
                    "event is not for the tracked database"
                );
            }
            for record_id in selected {
                match state
                    .jobs
                    .enqueue(TranscriptJob::new(record_id.as_str(), changed.event_type.as_str()))
                {
                    Ok(job_id) => tracing::info!(%job_id, %record_id, "transcript job enqueued"),
                    Err(e) => tracing::error!(error = %e, %record_id, "failed to enqueue transcript job"),
                }
            }
        }
    }

    Ok(received())
}

fn received() -> Json<Value> {
    Json(json!({ "received": true }))
}
