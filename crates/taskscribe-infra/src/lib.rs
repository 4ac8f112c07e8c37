//! Infrastructure layer for taskscribe.
//!
//! Contains implementations of the ports defined in `taskscribe-core`: the
//! Notion REST client (`Workspace`), the Anthropic Messages API provider
//! (`LlmProvider`), webhook signature verification, and environment-based
//! configuration loading.

pub mod config;
pub mod llm;
pub mod notion;
pub mod webhook;
