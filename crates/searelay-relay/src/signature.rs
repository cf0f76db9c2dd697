// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound webhook signature verification.
//!
//! The platform signs deliveries with a plain SHA-256 digest over the raw
//! request body bytes concatenated with the signing secret (not an HMAC),
//! hex-encoded into the `Signature` header. Verification MUST run against
//! the raw bytes captured before any JSON parsing: re-serialization can
//! change byte-for-byte content and invalidate the digest.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Computes the expected signature for a raw body under a signing secret.
pub fn expected_signature(raw_body: &[u8], secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_body);
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares a provided signature header against the expected digest.
///
/// Hex casing is normalized before the comparison (the platform's casing
/// guarantee is undocumented, so upper-hex senders are accepted), and the
/// comparison itself is constant-time.
pub fn signature_matches(raw_body: &[u8], provided: &str, secret: &str) -> bool {
    let expected = expected_signature(raw_body, secret);
    let provided = provided.trim().to_ascii_lowercase();
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_deterministic() {
        let a = expected_signature(b"{\"event_type\":\"x\"}", "s3cret");
        let b = expected_signature(b"{\"event_type\":\"x\"}", "s3cret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn differing_bodies_differ() {
        let a = expected_signature(b"body-one", "s3cret");
        let b = expected_signature(b"body-two", "s3cret");
        assert_ne!(a, b);
    }

    #[test]
    fn differing_secrets_differ() {
        let a = expected_signature(b"body", "secret-a");
        let b = expected_signature(b"body", "secret-b");
        assert_ne!(a, b);
    }

    #[test]
    fn matches_accepts_exact_digest() {
        let body = b"{\"event_id\":\"e1\"}";
        let sig = expected_signature(body, "s3cret");
        assert!(signature_matches(body, &sig, "s3cret"));
    }

    #[test]
    fn matches_is_case_insensitive() {
        let body = b"{\"event_id\":\"e1\"}";
        let sig = expected_signature(body, "s3cret").to_ascii_uppercase();
        assert!(signature_matches(body, &sig, "s3cret"));
    }

    #[test]
    fn matches_rejects_wrong_signature() {
        let body = b"{\"event_id\":\"e1\"}";
        assert!(!signature_matches(body, &"0".repeat(64), "s3cret"));
        assert!(!signature_matches(body, "not-hex", "s3cret"));
        assert!(!signature_matches(body, "", "s3cret"));
    }

    #[test]
    fn matches_rejects_tampered_body() {
        let sig = expected_signature(b"original", "s3cret");
        assert!(!signature_matches(b"tampered", &sig, "s3cret"));
    }
}
