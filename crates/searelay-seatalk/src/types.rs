// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SeaTalk OpenAPI request/response wire types.

use serde::{Deserialize, Serialize};

// --- Auth types ---

/// Credentials exchange request for `/auth/app_access_token`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    pub app_id: String,
    pub app_secret: String,
}

/// Response from the token endpoint.
///
/// Tenant API versions disagree on field names: the token arrives as
/// `access_token` or `app_access_token`, the ttl as `expires_in` or
/// `expire`. Both spellings are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub app_access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub expire: Option<u64>,
}

impl AuthResponse {
    /// The access token under either field name.
    pub fn token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .or(self.app_access_token.as_deref())
    }

    /// Advertised ttl in seconds, defaulting when the endpoint omits it.
    pub fn ttl_secs(&self) -> u64 {
        self.expires_in
            .or(self.expire)
            .unwrap_or(crate::token::DEFAULT_TOKEN_TTL_SECS)
    }
}

// --- Generic acknowledgement ---

/// The `{code, message}` acknowledgement body most OpenAPI endpoints return.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiAck {
    /// Zero means success. Some tenants send the number `0`, others the
    /// string `"0"`, so the raw JSON value is kept and normalized on read.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiAck {
    /// True when the body's status code equals zero in either spelling.
    pub fn code_is_zero(&self) -> bool {
        match &self.code {
            Some(serde_json::Value::Number(n)) => n.as_i64() == Some(0),
            Some(serde_json::Value::String(s)) => s == "0",
            _ => false,
        }
    }

    /// The code rendered as a string, for diagnostics.
    pub fn code_str(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }
}

// --- Interactive card elements ---

/// A single element of an interactive card, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "element_type", rename_all = "snake_case")]
pub enum CardElement {
    Title { title: TextNode },
    Description { description: TextNode },
    Button { button: CallbackButton },
}

impl CardElement {
    pub fn title(text: impl Into<String>) -> Self {
        CardElement::Title {
            title: TextNode { text: text.into() },
        }
    }

    pub fn description(text: impl Into<String>) -> Self {
        CardElement::Description {
            description: TextNode { text: text.into() },
        }
    }

    /// A callback button whose `value` blob is echoed back on click.
    pub fn callback_button(text: impl Into<String>, value: impl Into<String>) -> Self {
        CardElement::Button {
            button: CallbackButton {
                button_type: "callback".to_string(),
                text: text.into(),
                value: value.into(),
            },
        }
    }
}

/// Plain text node used by titles and descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
}

/// Button payload within a card element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackButton {
    pub button_type: String,
    pub text: String,
    pub value: String,
}

// --- Message envelopes ---

/// The tagged message envelope accepted by the send endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum MessageEnvelope {
    Text { text: TextContent },
    InteractiveMessage { interactive_message: InteractiveBody },
}

impl MessageEnvelope {
    pub fn text(content: impl Into<String>) -> Self {
        MessageEnvelope::Text {
            text: TextContent {
                content: content.into(),
            },
        }
    }

    pub fn card(elements: Vec<CardElement>) -> Self {
        MessageEnvelope::InteractiveMessage {
            interactive_message: InteractiveBody { elements },
        }
    }
}

/// Text message content.
#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    pub content: String,
}

/// Element list wrapper used by interactive sends and card updates.
#[derive(Debug, Clone, Serialize)]
pub struct InteractiveBody {
    pub elements: Vec<CardElement>,
}

/// Send to a single employee, addressed by resolved employee code.
#[derive(Debug, Clone, Serialize)]
pub struct SingleChatRequest {
    pub employee_code: String,
    pub message: MessageEnvelope,
}

/// Send to a group chat.
#[derive(Debug, Clone, Serialize)]
pub struct GroupChatRequest {
    pub group_id: String,
    pub message: MessageEnvelope,
}

// --- Contact lookup ---

/// Email-to-employee lookup request.
#[derive(Debug, Clone, Serialize)]
pub struct ContactsRequest {
    pub emails: Vec<String>,
}

/// Lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactsResponse {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub employees: Vec<EmployeeProfile>,
}

/// One employee record from the contact lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeProfile {
    #[serde(default)]
    pub email: String,
    pub employee_code: String,
    /// Platform status enumeration; only [`EMPLOYEE_STATUS_ACTIVE`] may
    /// receive messages.
    #[serde(default)]
    pub employee_status: i64,
}

/// Status value marking an employee as active in the platform enumeration.
pub const EMPLOYEE_STATUS_ACTIVE: i64 = 2;

// --- Card update ---

/// Card update request; `message.tag` distinguishes the two payload shapes
/// accepted by different backend tenants.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRequest {
    pub message_id: String,
    pub message: UpdateMessage,
}

/// Inner update body. `tag` is present only in the tagged shape.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub interactive_message: InteractiveBody,
}

// --- Fan-out reporting ---

/// Per-recipient outcome of a batch send.
#[derive(Debug, Clone, Serialize)]
pub struct SendReport {
    pub recipient: String,
    pub ok: bool,
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_element_wire_format() {
        let el = CardElement::title("Status update");
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"element_type": "title", "title": {"text": "Status update"}})
        );

        let el = CardElement::callback_button("Confirm", r#"{"action":"ack"}"#);
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["element_type"], "button");
        assert_eq!(json["button"]["button_type"], "callback");
        assert_eq!(json["button"]["value"], r#"{"action":"ack"}"#);
    }

    #[test]
    fn text_envelope_wire_format() {
        let env = MessageEnvelope::text("hello");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"tag": "text", "text": {"content": "hello"}})
        );
    }

    #[test]
    fn card_envelope_wire_format() {
        let env = MessageEnvelope::card(vec![CardElement::description("done")]);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["tag"], "interactive_message");
        assert_eq!(
            json["interactive_message"]["elements"][0]["element_type"],
            "description"
        );
    }

    #[test]
    fn update_request_shapes() {
        let bare = UpdateRequest {
            message_id: "m1".into(),
            message: UpdateMessage {
                tag: None,
                interactive_message: InteractiveBody {
                    elements: vec![CardElement::description("ok")],
                },
            },
        };
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json["message"].get("tag").is_none());

        let tagged = UpdateRequest {
            message_id: "m1".into(),
            message: UpdateMessage {
                tag: Some("interactive_message".into()),
                interactive_message: InteractiveBody {
                    elements: vec![CardElement::description("ok")],
                },
            },
        };
        let json = serde_json::to_value(&tagged).unwrap();
        assert_eq!(json["message"]["tag"], "interactive_message");
    }

    #[test]
    fn ack_code_zero_accepts_both_spellings() {
        let numeric: ApiAck = serde_json::from_str(r#"{"code": 0}"#).unwrap();
        assert!(numeric.code_is_zero());

        let string: ApiAck = serde_json::from_str(r#"{"code": "0"}"#).unwrap();
        assert!(string.code_is_zero());

        let nonzero: ApiAck = serde_json::from_str(r#"{"code": 1}"#).unwrap();
        assert!(!nonzero.code_is_zero());
        assert_eq!(nonzero.code_str().as_deref(), Some("1"));

        let absent: ApiAck = serde_json::from_str("{}").unwrap();
        assert!(!absent.code_is_zero());
    }

    #[test]
    fn auth_response_field_tolerance() {
        let a: AuthResponse =
            serde_json::from_str(r#"{"access_token": "t1", "expires_in": 600}"#).unwrap();
        assert_eq!(a.token(), Some("t1"));
        assert_eq!(a.ttl_secs(), 600);

        let b: AuthResponse =
            serde_json::from_str(r#"{"app_access_token": "t2", "expire": 900}"#).unwrap();
        assert_eq!(b.token(), Some("t2"));
        assert_eq!(b.ttl_secs(), 900);

        let c: AuthResponse = serde_json::from_str(r#"{"access_token": "t3"}"#).unwrap();
        assert_eq!(c.ttl_secs(), crate::token::DEFAULT_TOKEN_TTL_SECS);
    }
}
