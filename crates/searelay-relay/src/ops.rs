// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator endpoints for triggering sends by hand.
//!
//! Unlike the callback path, these are invoked by a human expecting
//! feedback, so failures surface as structured JSON with a real status
//! code instead of being masked behind "ok".

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use searelay_core::{ActionDescriptor, RelayError};
use searelay_seatalk::{CardElement, SendReport};
use serde::{Deserialize, Serialize};

use crate::server::RelayState;

/// Request body for POST /ops/send-text.
#[derive(Debug, Deserialize)]
pub struct SendTextRequest {
    /// Message text. Defaults to a ping marker.
    #[serde(default = "default_text")]
    pub text: String,
    /// Per-person recipients; when non-empty the send fans out by email.
    #[serde(default)]
    pub emails: Vec<String>,
    /// Target group. Defaults to the configured group when absent.
    #[serde(default)]
    pub group_id: Option<String>,
}

fn default_text() -> String {
    "Ping from searelay".to_string()
}

/// Request body for POST /ops/send-card.
#[derive(Debug, Deserialize)]
pub struct SendCardRequest {
    #[serde(default = "default_card_title")]
    pub title: String,
    #[serde(default = "default_card_description")]
    pub description: String,
    #[serde(default = "default_button_text")]
    pub button_text: String,
    /// Correlation id embedded in the button's action descriptor.
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub group_id: Option<String>,
}

fn default_card_title() -> String {
    "Confirmation requested".to_string()
}

fn default_card_description() -> String {
    "Click to confirm.".to_string()
}

fn default_button_text() -> String {
    "Confirm".to_string()
}

fn default_protocol() -> String {
    "OPS".to_string()
}

/// Response for fan-out sends.
#[derive(Debug, Serialize)]
pub struct FanoutResponse {
    pub reports: Vec<SendReport>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// POST /ops/send-text
pub async fn send_text(
    State(state): State<RelayState>,
    Json(body): Json<SendTextRequest>,
) -> Response {
    if !body.emails.is_empty() {
        let reports = state.seatalk.send_text_fanout(&body.emails, &body.text).await;
        return Json(FanoutResponse { reports }).into_response();
    }

    match resolve_group(&state, body.group_id.as_deref()) {
        Ok(group_id) => match state.seatalk.send_text_to_group(&group_id, &body.text).await {
            Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
            Err(e) => error_response(e),
        },
        Err(e) => error_response(e),
    }
}

/// POST /ops/send-card
pub async fn send_card(
    State(state): State<RelayState>,
    Json(body): Json<SendCardRequest>,
) -> Response {
    let value = ActionDescriptor::new("ack", body.protocol.clone()).to_value_blob();
    let elements = vec![
        CardElement::title(body.title.clone()),
        CardElement::description(body.description.clone()),
        CardElement::callback_button(body.button_text.clone(), value),
    ];

    if !body.emails.is_empty() {
        let reports = state.seatalk.send_card_fanout(&body.emails, &elements).await;
        return Json(FanoutResponse { reports }).into_response();
    }

    match resolve_group(&state, body.group_id.as_deref()) {
        Ok(group_id) => match state.seatalk.send_card_to_group(&group_id, elements).await {
            Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
            Err(e) => error_response(e),
        },
        Err(e) => error_response(e),
    }
}

fn resolve_group(state: &RelayState, requested: Option<&str>) -> Result<String, RelayError> {
    requested
        .or(state.seatalk.default_group())
        .map(str::to_string)
        .ok_or_else(|| {
            RelayError::Config(
                "no group_id in request and seatalk.group_id is unset".to_string(),
            )
        })
}

fn error_response(err: RelayError) -> Response {
    let status = match &err {
        RelayError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RelayError::Auth { .. } | RelayError::Transport { .. } => StatusCode::BAD_GATEWAY,
        RelayError::RecipientNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}
