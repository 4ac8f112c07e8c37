//! Webhook delivery authentication.

pub mod signature;

pub use signature::{SIGNATURE_HEADER, compute_signature, verify_signature};
