//! HTTP request handlers.

pub mod status;
pub mod webhook;
