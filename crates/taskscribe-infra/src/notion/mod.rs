//! Notion workspace adapter.

pub mod client;
pub mod types;

pub use client::NotionClient;
