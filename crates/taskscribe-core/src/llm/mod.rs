//! LLM provider abstraction for taskscribe.
//!
//! `LlmProvider` is the seam between the summarizer and a concrete backend
//! (Anthropic in production, scripted fakes in tests).

pub mod provider;
