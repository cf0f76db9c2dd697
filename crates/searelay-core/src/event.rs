// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound callback event model.
//!
//! Every webhook delivery carries an `event_type` discriminator, an optional
//! `event_id` used for deduplication, and an opaque `event` map whose shape
//! depends on the type. The envelope is parsed fresh per request and never
//! persisted.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Classified callback event type.
///
/// Unrecognized types parse into [`EventKind::Other`] and are acknowledged
/// without processing.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    /// URL-ownership verification challenge. Bypasses signature checking.
    EventVerification,
    /// A user clicked a callback button on an interactive card.
    InteractiveMessageClick,
    /// Anything else the platform may deliver.
    #[strum(default)]
    Other(String),
}

/// The outer JSON envelope of a webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackEnvelope {
    /// Delivery id used for the dedup window. Absent on some event types.
    #[serde(default)]
    pub event_id: Option<String>,

    /// Raw event type string as sent by the platform.
    #[serde(default)]
    pub event_type: String,

    /// Type-dependent payload. Kept opaque here; the dispatcher pulls the
    /// fields it needs per branch.
    #[serde(default)]
    pub event: serde_json::Value,
}

impl CallbackEnvelope {
    /// Classifies the raw `event_type` string.
    pub fn kind(&self) -> EventKind {
        self.event_type
            .parse()
            .unwrap_or_else(|_| EventKind::Other(self.event_type.clone()))
    }

    /// Returns a string field from the inner `event` map, if present.
    pub fn event_str(&self, key: &str) -> Option<&str> {
        self.event.get(key).and_then(|v| v.as_str())
    }
}

/// The action descriptor embedded in a callback button's `value` blob.
///
/// Serialized into the button when a card is sent, echoed back verbatim by
/// the platform on click, and parsed out again here. It must survive that
/// round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// What the click means ("ack", "sim", ...).
    pub action: String,

    /// Correlation id tying the click back to the originating workflow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

impl ActionDescriptor {
    pub fn new(action: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            protocol: Some(protocol.into()),
        }
    }

    /// Serializes the descriptor for embedding in a button `value`.
    pub fn to_value_blob(&self) -> String {
        // Two string fields; serialization cannot fail.
        serde_json::to_string(self).expect("descriptor serializes")
    }

    /// Parses a descriptor from a click event's `value` field.
    ///
    /// Tenants differ in how the blob comes back: some echo the JSON string
    /// we embedded, others re-parse it and deliver a structured map. Both
    /// forms are accepted.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => serde_json::from_str(s).ok(),
            serde_json::Value::Object(_) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_parses_known_types() {
        let env: CallbackEnvelope = serde_json::from_str(
            r#"{"event_type":"event_verification","event":{}}"#,
        )
        .unwrap();
        assert_eq!(env.kind(), EventKind::EventVerification);

        let env: CallbackEnvelope = serde_json::from_str(
            r#"{"event_id":"e1","event_type":"interactive_message_click","event":{}}"#,
        )
        .unwrap();
        assert_eq!(env.kind(), EventKind::InteractiveMessageClick);
        assert_eq!(env.event_id.as_deref(), Some("e1"));
    }

    #[test]
    fn event_kind_falls_back_to_other() {
        let env: CallbackEnvelope =
            serde_json::from_str(r#"{"event_type":"message_received","event":{}}"#).unwrap();
        assert_eq!(env.kind(), EventKind::Other("message_received".into()));
    }

    #[test]
    fn envelope_tolerates_missing_fields() {
        let env: CallbackEnvelope = serde_json::from_str("{}").unwrap();
        assert!(env.event_id.is_none());
        assert_eq!(env.kind(), EventKind::Other(String::new()));
        assert!(env.event_str("seatalk_challenge").is_none());
    }

    #[test]
    fn descriptor_round_trips_through_string_value() {
        let desc = ActionDescriptor::new("sim", "X");
        let blob = desc.to_value_blob();
        let echoed = serde_json::Value::String(blob);
        assert_eq!(ActionDescriptor::from_value(&echoed), Some(desc));
    }

    #[test]
    fn descriptor_round_trips_through_map_value() {
        let desc = ActionDescriptor::new("sim", "X");
        let echoed: serde_json::Value =
            serde_json::from_str(&desc.to_value_blob()).unwrap();
        assert!(echoed.is_object());
        assert_eq!(ActionDescriptor::from_value(&echoed), Some(desc));
    }

    #[test]
    fn descriptor_without_protocol() {
        let echoed = serde_json::Value::String(r#"{"action":"ack"}"#.into());
        let desc = ActionDescriptor::from_value(&echoed).unwrap();
        assert_eq!(desc.action, "ack");
        assert!(desc.protocol.is_none());
    }

    #[test]
    fn descriptor_rejects_non_object_values() {
        assert!(ActionDescriptor::from_value(&serde_json::json!(42)).is_none());
        assert!(ActionDescriptor::from_value(&serde_json::Value::String("not json".into()))
            .is_none());
    }
}
