// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External append-log sink.
//!
//! The spreadsheet (or whatever sits behind the configured URL) is a black
//! box with an `append(row)` contract. Appends are best-effort: failures are
//! swallowed by callers and surfaced only through diagnostics, never through
//! the callback response.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use searelay_core::RelayError;
use serde::Serialize;
use tracing::debug;

/// One appended log row.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRow {
    pub timestamp: DateTime<Utc>,
    /// Who clicked (email or platform id), `-` when unknown.
    pub actor: String,
    /// Action string from the parsed descriptor.
    pub action: String,
    pub message_id: String,
    /// Group or chat id the event originated from.
    pub scope_id: String,
}

/// Append-only log sink contract.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, row: AuditRow) -> Result<(), RelayError>;
}

/// Sink that POSTs each row as JSON to a configured endpoint.
#[derive(Debug)]
pub struct HttpAuditSink {
    http: reqwest::Client,
    url: String,
}

impl HttpAuditSink {
    pub fn new(url: String, timeout: Duration) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Transport {
                message: format!("failed to build audit sink client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl AuditSink for HttpAuditSink {
    async fn append(&self, row: AuditRow) -> Result<(), RelayError> {
        let response = self
            .http
            .post(&self.url)
            .json(&row)
            .send()
            .await
            .map_err(|e| RelayError::Transport {
                message: format!("audit append failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Transport {
                message: format!("audit sink returned {status}"),
                source: None,
            });
        }
        debug!(message_id = row.message_id.as_str(), "audit row appended");
        Ok(())
    }
}

/// Sink used when no audit URL is configured.
#[derive(Debug, Default)]
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn append(&self, _row: AuditRow) -> Result<(), RelayError> {
        Ok(())
    }
}
