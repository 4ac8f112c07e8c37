//! Pipeline logic and provider trait definitions for taskscribe.
//!
//! This crate defines the "ports" (`LlmProvider`, `Workspace`, `Clock`) that
//! the infrastructure layer implements, plus every piece of logic between an
//! inbound webhook and a created page. It depends only on `taskscribe-types`
//! -- never on `taskscribe-infra` or any HTTP crate.

pub mod date;
pub mod event;
pub mod llm;
pub mod markdown;
pub mod page;
pub mod pipeline;
pub mod queue;
pub mod summarize;
pub mod transcript;
pub mod workspace;
