// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback dispatcher: classifies an inbound webhook delivery and routes
//! it through verification, signature checking, deduplication, and the
//! click-handling pipeline.
//!
//! Response contract: the platform expects a fast 200 and retries anything
//! else, so every branch except the verification echo and a strict-mode
//! signature rejection acknowledges with 200 `"ok"`, including branches
//! whose internal side effects failed. Internal errors must never escape
//! as a 5xx here.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use searelay_core::{ActionDescriptor, CallbackEnvelope, EventKind};
use searelay_seatalk::CardElement;
use tracing::{debug, info, warn};

use crate::server::RelayState;
use crate::signature;
use crate::sink::AuditRow;

/// Text shown on the rewritten card and in the fallback message.
const ACK_TEXT: &str = "Thanks for responding ✅";

/// POST `/` and POST `/callback`. Both routes land here and behave
/// identically.
pub async fn handle_callback(
    State(state): State<RelayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let envelope: CallbackEnvelope = match serde_json::from_slice(&body) {
        Ok(env) => env,
        Err(e) => {
            // Masked like any other internal failure: a non-200 would only
            // make the platform redeliver the same unparsable body.
            warn!(error = %e, "discarding unparsable callback body");
            return ack();
        }
    };

    // 1) URL verification. Precedes signature checking: challenge delivery
    //    happens before secret provisioning on some tenants.
    if envelope.kind() == EventKind::EventVerification {
        let challenge = envelope.event_str("seatalk_challenge").unwrap_or_default();
        debug!("answering URL verification challenge");
        return Json(serde_json::json!({ "seatalk_challenge": challenge })).into_response();
    }

    // 2) Signature validation over the raw body bytes.
    let provided = headers
        .get("signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if let Some(ref secret) = state.signing_secret
        && !signature::signature_matches(&body, provided, secret)
    {
        if state.reject_on_mismatch {
            warn!("signature mismatch, rejecting delivery");
            return (StatusCode::FORBIDDEN, "unauthorized").into_response();
        }
        warn!("signature mismatch, continuing per callback.reject_on_mismatch=false");
    }

    // 3) Dedup by event id. Duplicates ack without reprocessing.
    if let Some(ref event_id) = envelope.event_id
        && state.dedup.seen(event_id)
    {
        debug!(event_id = event_id.as_str(), "duplicate delivery suppressed");
        return ack();
    }

    // Re-deliver fresh events to the legacy endpoint; never blocks the ack.
    if let Some(ref forwarder) = state.forwarder {
        let sig = headers
            .get("signature")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        forwarder.dispatch(body.clone(), sig);
    }

    match envelope.kind() {
        EventKind::InteractiveMessageClick => {
            handle_click(&state, &envelope).await;
        }
        other => {
            debug!(event_type = %other, "event acknowledged without processing");
        }
    }

    ack()
}

/// The terminal acknowledgement for every non-verification branch.
fn ack() -> Response {
    (StatusCode::OK, "ok").into_response()
}

/// Button-click pipeline: update the card, fall back to a text
/// acknowledgement when the update does not succeed, then append an audit
/// row. Every failure is caught and logged; the caller always acks.
async fn handle_click(state: &RelayState, envelope: &CallbackEnvelope) {
    let message_id = envelope.event_str("message_id").unwrap_or_default();
    let descriptor = envelope
        .event
        .get("value")
        .and_then(ActionDescriptor::from_value);
    let action = descriptor
        .as_ref()
        .map(|d| d.action.clone())
        .unwrap_or_else(|| "-".to_string());
    let protocol = descriptor
        .and_then(|d| d.protocol)
        .unwrap_or_else(|| "-".to_string());
    let actor = envelope
        .event_str("email")
        .or_else(|| envelope.event_str("seatalk_id"))
        .unwrap_or("-")
        .to_string();
    let scope = envelope
        .event_str("group_id")
        .or_else(|| envelope.event_str("chat_id"))
        .map(str::to_string)
        .or_else(|| state.seatalk.default_group().map(str::to_string));

    info!(
        message_id,
        action = action.as_str(),
        protocol = protocol.as_str(),
        actor = actor.as_str(),
        "processing card click"
    );

    let mut updated = false;
    if message_id.is_empty() {
        warn!("click event carries no message_id, skipping card update");
    } else {
        match state
            .seatalk
            .update_card(message_id, vec![CardElement::description(ACK_TEXT)])
            .await
        {
            Ok(outcome) if outcome.applied() => updated = true,
            Ok(outcome) => {
                warn!(message_id, ?outcome, "card update not accepted");
            }
            Err(e) => {
                warn!(message_id, error = %e, "card update errored");
            }
        }
    }

    // The user must always receive some confirmation.
    if !updated {
        match scope {
            Some(ref group_id) => {
                let text = format!("{ACK_TEXT} (protocol: {protocol})");
                if let Err(e) = state.seatalk.send_text_to_group(group_id, &text).await {
                    warn!(group_id = group_id.as_str(), error = %e, "fallback send failed");
                }
            }
            None => {
                warn!("no group in event and no default group configured, skipping fallback");
            }
        }
    }

    // Best-effort audit append on a detached task; a slow or failing sink
    // must not hold up the acknowledgement.
    let row = AuditRow {
        timestamp: Utc::now(),
        actor,
        action,
        message_id: message_id.to_string(),
        scope_id: scope.unwrap_or_else(|| "-".to_string()),
    };
    let sink = state.sink.clone();
    tokio::spawn(async move {
        if let Err(e) = sink.append(row).await {
            warn!(error = %e, "audit append failed");
        }
    });
}
