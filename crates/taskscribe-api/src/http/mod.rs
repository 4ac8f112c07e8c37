//! HTTP layer: the webhook endpoint and two status endpoints.

pub mod error;
pub mod handlers;
pub mod router;
