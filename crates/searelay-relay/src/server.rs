// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relay HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. The callback is served on
//! both `/` and `/callback` (the platform sometimes posts to the root), and
//! the health probe is disambiguated from the callback by method.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use searelay_config::RelayConfig;
use searelay_core::RelayError;
use searelay_seatalk::SeatalkClient;
use tower_http::trace::TraceLayer;

use crate::dedup::RecentEventWindow;
use crate::dispatch;
use crate::forward::Forwarder;
use crate::ops;
use crate::sink::{AuditSink, HttpAuditSink, NoopAuditSink};

/// Shared state for axum request handlers.
///
/// The token cache lives inside the client; the dedup window is the only
/// other process-wide mutable state. Both are owned here and injected, so
/// tests get full isolation.
#[derive(Clone)]
pub struct RelayState {
    /// Outbound OpenAPI client (owns the token cache).
    pub seatalk: Arc<SeatalkClient>,
    /// Recent-event-id window for webhook dedup.
    pub dedup: Arc<RecentEventWindow>,
    /// External append-log sink.
    pub sink: Arc<dyn AuditSink>,
    /// Legacy-endpoint forwarder, when configured.
    pub forwarder: Option<Arc<Forwarder>>,
    /// Webhook signing secret. `None` skips verification.
    pub signing_secret: Option<String>,
    /// Reject mismatches with 403 (true) or log-and-continue (false).
    pub reject_on_mismatch: bool,
}

impl RelayState {
    /// Builds the full state graph from configuration.
    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        let timeout = Duration::from_secs(config.seatalk.timeout_secs);

        let sink: Arc<dyn AuditSink> = match &config.audit.url {
            Some(url) => Arc::new(HttpAuditSink::new(url.clone(), timeout)?),
            None => Arc::new(NoopAuditSink),
        };

        let forwarder = config
            .forward
            .url
            .as_ref()
            .map(|url| {
                Forwarder::new(url.clone(), config.forward.max_in_flight, timeout)
                    .map(Arc::new)
            })
            .transpose()?;

        Ok(Self {
            seatalk: Arc::new(SeatalkClient::new(&config.seatalk)?),
            dedup: Arc::new(RecentEventWindow::new(config.callback.dedup_capacity)),
            sink,
            forwarder,
            signing_secret: config.seatalk.signing_secret.clone(),
            reject_on_mismatch: config.callback.reject_on_mismatch,
        })
    }
}

/// Builds the relay router.
pub fn build_router(state: RelayState) -> Router {
    Router::new()
        .route("/", get(health).post(dispatch::handle_callback))
        .route("/callback", post(dispatch::handle_callback))
        .route("/healthz", get(health))
        .route("/ops/send-text", post(ops::send_text))
        .route("/ops/send-card", post(ops::send_card))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET `/` and `/healthz`.
async fn health() -> &'static str {
    "ok"
}

/// Binds the configured address and serves the relay until the task is
/// cancelled or the listener fails.
pub async fn start_server(host: &str, port: u16, state: RelayState) -> Result<(), RelayError> {
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RelayError::Transport {
            message: format!("failed to bind relay to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("relay listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| RelayError::Transport {
            message: format!("relay server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
