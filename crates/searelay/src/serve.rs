// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `searelay serve` command implementation.
//!
//! Wires the OpenAPI client, dedup window, audit sink, and forwarder into
//! the relay state, then runs the axum server until ctrl-c.

use searelay_config::RelayConfig;
use searelay_core::RelayError;
use searelay_relay::{start_server, RelayState};
use tracing::{info, warn};

/// Runs the `searelay serve` command.
pub async fn run_serve(config: RelayConfig) -> Result<(), RelayError> {
    init_tracing(&config.service.log_level);

    info!("starting searelay serve");

    if config.seatalk.signing_secret.is_none() {
        // Open deployments are supported, but the operator should know.
        warn!("seatalk.signing_secret is unset -- webhook signature verification is disabled");
    }
    if config.seatalk.app_id.is_none() {
        warn!("seatalk.app_id is unset -- outbound calls will fail until credentials are configured");
    }

    let state = RelayState::from_config(&config)?;
    info!(
        forwarding = state.forwarder.is_some(),
        strict_signature = state.reject_on_mismatch,
        "relay state initialized"
    );

    let host = config.service.host.clone();
    let port = config.service.port;

    tokio::select! {
        result = start_server(&host, port, state) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            Ok(())
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("searelay={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
