// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the searelay webhook relay.

use thiserror::Error;

/// The primary error type used across searelay crates.
///
/// Propagation policy: the callback path catches every variant, logs it, and
/// still acknowledges the platform with "ok" so the upstream does not
/// retry-storm. Operator-facing endpoints surface these as structured JSON
/// with a real status code instead.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Configuration errors (missing app credentials, unset group id).
    /// Not retried; the caller is expected to fail fast.
    #[error("configuration error: {0}")]
    Config(String),

    /// The token endpoint failed or returned no usable access token.
    #[error("auth error: {message}")]
    Auth {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound HTTP failure or non-2xx response. Caught per call; triggers
    /// the fallback path where one is defined.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Contact lookup yielded no active match for a recipient. Reported
    /// per-recipient in batch results; never aborts the batch.
    #[error("recipient not found: {recipient} ({reason})")]
    RecipientNotFound { recipient: String, reason: String },

    /// Inbound webhook signature did not match the expected digest.
    #[error("webhook signature mismatch")]
    SignatureMismatch,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
