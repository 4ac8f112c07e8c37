//! HMAC-SHA256 verification of inbound webhook deliveries.
//!
//! Deliveries carry `X-Notion-Signature: sha256=<hex>` where `<hex>` is the
//! lowercase HMAC-SHA256 of the raw request body keyed with the shared secret.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-notion-signature";

/// Prefix of the header value.
pub const SIGNATURE_PREFIX: &str = "sha256=";

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

fn keyed_mac(secret: &[u8], body: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(body);
    Some(mac)
}

/// The full header value (`sha256=<hex>`) for `body` under `secret`.
///
/// `None` only if the HMAC rejects the key.
pub fn compute_signature(secret: &[u8], body: &[u8]) -> Option<String> {
    let mac = keyed_mac(secret, body)?;
    Some(format!(
        "{SIGNATURE_PREFIX}{}",
        hex_encode(&mac.finalize().into_bytes())
    ))
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Check a delivery's signature.
///
/// With no secret configured (absent or empty) every delivery is accepted.
/// Otherwise `signature` must be `sha256=` followed by the lowercase hex
/// digest, which the HMAC checks in constant time. A missing or malformed
/// header never matches.
pub fn verify_signature(secret: Option<&SecretString>, body: &[u8], signature: Option<&str>) -> bool {
    let secret = match secret.map(|s| s.expose_secret()) {
        Some(s) if !s.is_empty() => s,
        _ => return true,
    };
    let Some(digest) = signature
        .and_then(|s| s.strip_prefix(SIGNATURE_PREFIX))
        .and_then(hex_decode)
    else {
        return false;
    };
    match keyed_mac(secret.as_bytes(), body) {
        Some(mac) => mac.verify_slice(&digest).is_ok(),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Encode bytes to a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode lowercase hex. Uppercase digits and odd lengths are rejected.
fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    fn nibble(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            _ => None,
        }
    }
    let bytes = hex.as_bytes();
    if bytes.len() % 2 != 0 {
        return None;
    }
    bytes
        .chunks_exact(2)
        .map(|pair| Some((nibble(pair[0])? << 4) | nibble(pair[1])?))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
