// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fire-and-forget re-delivery of raw webhook bodies to a legacy endpoint.
//!
//! Forwarding must never delay or fail the primary acknowledgement, so each
//! delivery runs on a detached task. Concurrency is bounded by a semaphore;
//! when every permit is in use the delivery is dropped, not queued. There
//! is no retry and no ordering guarantee relative to the primary response.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use searelay_core::RelayError;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Bounded fire-and-forget forwarder.
#[derive(Debug)]
pub struct Forwarder {
    http: reqwest::Client,
    url: String,
    permits: Arc<Semaphore>,
}

impl Forwarder {
    pub fn new(
        url: String,
        max_in_flight: usize,
        timeout: Duration,
    ) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Transport {
                message: format!("failed to build forwarder client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            url,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        })
    }

    /// Re-POSTs the raw body (and original signature header, when present)
    /// on a detached task. Returns immediately.
    pub fn dispatch(&self, body: Bytes, signature: Option<String>) {
        let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() else {
            warn!(url = self.url.as_str(), "forwarder saturated, dropping delivery");
            return;
        };

        let http = self.http.clone();
        let url = self.url.clone();

        tokio::spawn(async move {
            let _permit = permit;
            let mut request = http
                .post(&url)
                .header("content-type", "application/json")
                .body(body);
            if let Some(sig) = signature {
                request = request.header("Signature", sig);
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(url = url.as_str(), "forwarded webhook delivery");
                }
                Ok(response) => {
                    warn!(
                        url = url.as_str(),
                        status = %response.status(),
                        "legacy endpoint rejected forwarded delivery"
                    );
                }
                Err(e) => {
                    warn!(url = url.as_str(), error = %e, "forward failed");
                }
            }
        });
    }
}
