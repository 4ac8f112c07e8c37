//! Shared domain types for taskscribe.
//!
//! Webhook payloads, retrieved workspace pages, content blocks, the structured
//! task-list output, job records, LLM request/response shapes, and the error
//! enums that travel between crates.
//!
//! No infrastructure dependencies -- serde, uuid, chrono, thiserror, plus
//! schemars for the structured-output schema and secrecy for credentials.

pub mod config;
pub mod job;
pub mod llm;
pub mod page;
pub mod task;
pub mod webhook;
