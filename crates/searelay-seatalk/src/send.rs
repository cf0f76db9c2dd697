// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message sending: single-recipient, group, and batch fan-out.
//!
//! Per-person sends resolve the recipient's email to a platform employee
//! code first and refuse inactive accounts. Batch fan-out catches errors
//! per recipient so one failure never aborts the rest.

use searelay_core::RelayError;
use tracing::warn;

use crate::client::SeatalkClient;
use crate::types::{
    CardElement, ContactsRequest, ContactsResponse, GroupChatRequest, MessageEnvelope,
    SendReport, SingleChatRequest, EMPLOYEE_STATUS_ACTIVE,
};

pub(crate) const CONTACTS_PATH: &str = "/contacts/v2/profile";
pub(crate) const SINGLE_CHAT_PATH: &str = "/messaging/v2/single_chat";
pub(crate) const GROUP_CHAT_PATH: &str = "/messaging/v2/group_chat";

impl SeatalkClient {
    /// Resolves an email to a platform employee code.
    ///
    /// Fails with `RecipientNotFound` when the lookup returns no matching
    /// record or the match is not active (status 2 in the platform
    /// enumeration).
    pub async fn resolve_employee(&self, email: &str) -> Result<String, RelayError> {
        let request = ContactsRequest {
            emails: vec![email.to_string()],
        };
        let (status, profile) = self.post_contacts(&request).await?;

        if !status.is_success() {
            return Err(RelayError::Transport {
                message: format!("contact lookup returned {status}"),
                source: None,
            });
        }

        let record = profile
            .employees
            .iter()
            .find(|e| e.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| RelayError::RecipientNotFound {
                recipient: email.to_string(),
                reason: "no matching employee".to_string(),
            })?;

        if record.employee_status != EMPLOYEE_STATUS_ACTIVE {
            return Err(RelayError::RecipientNotFound {
                recipient: email.to_string(),
                reason: format!(
                    "employee status {} is not active",
                    record.employee_status
                ),
            });
        }

        Ok(record.employee_code.clone())
    }

    /// Contact lookup needs the full typed response rather than the generic
    /// acknowledgement, so it bypasses `post_api`.
    async fn post_contacts(
        &self,
        request: &ContactsRequest,
    ) -> Result<(reqwest::StatusCode, ContactsResponse), RelayError> {
        let token = self.get_token().await?;
        let response = self
            .http_post_json(CONTACTS_PATH, &token, request)
            .await?;
        let status = response.status();
        let body = response
            .json::<ContactsResponse>()
            .await
            .unwrap_or(ContactsResponse {
                code: None,
                employees: Vec::new(),
            });
        Ok((status, body))
    }

    /// Sends a plain text message to one recipient, addressed by email.
    pub async fn send_text_to_user(&self, email: &str, text: &str) -> Result<(), RelayError> {
        let employee_code = self.resolve_employee(email).await?;
        self.send_single(SingleChatRequest {
            employee_code,
            message: MessageEnvelope::text(text),
        })
        .await
    }

    /// Sends an interactive card to one recipient, addressed by email.
    pub async fn send_card_to_user(
        &self,
        email: &str,
        elements: Vec<CardElement>,
    ) -> Result<(), RelayError> {
        let employee_code = self.resolve_employee(email).await?;
        self.send_single(SingleChatRequest {
            employee_code,
            message: MessageEnvelope::card(elements),
        })
        .await
    }

    /// Sends a plain text message to a group chat.
    pub async fn send_text_to_group(&self, group_id: &str, text: &str) -> Result<(), RelayError> {
        self.send_group(GroupChatRequest {
            group_id: group_id.to_string(),
            message: MessageEnvelope::text(text),
        })
        .await
    }

    /// Sends an interactive card to a group chat.
    pub async fn send_card_to_group(
        &self,
        group_id: &str,
        elements: Vec<CardElement>,
    ) -> Result<(), RelayError> {
        self.send_group(GroupChatRequest {
            group_id: group_id.to_string(),
            message: MessageEnvelope::card(elements),
        })
        .await
    }

    /// Sends the same text to each email independently.
    ///
    /// One report per recipient, in input order; a failed recipient never
    /// aborts the remaining ones.
    pub async fn send_text_fanout(&self, emails: &[String], text: &str) -> Vec<SendReport> {
        let mut reports = Vec::with_capacity(emails.len());
        for email in emails {
            let report = match self.send_text_to_user(email, text).await {
                Ok(()) => SendReport {
                    recipient: email.clone(),
                    ok: true,
                    detail: "sent".to_string(),
                },
                Err(e) => {
                    warn!(recipient = email.as_str(), error = %e, "fan-out send failed");
                    SendReport {
                        recipient: email.clone(),
                        ok: false,
                        detail: e.to_string(),
                    }
                }
            };
            reports.push(report);
        }
        reports
    }

    /// Sends the same card to each email independently.
    pub async fn send_card_fanout(
        &self,
        emails: &[String],
        elements: &[CardElement],
    ) -> Vec<SendReport> {
        let mut reports = Vec::with_capacity(emails.len());
        for email in emails {
            let report = match self.send_card_to_user(email, elements.to_vec()).await {
                Ok(()) => SendReport {
                    recipient: email.clone(),
                    ok: true,
                    detail: "sent".to_string(),
                },
                Err(e) => {
                    warn!(recipient = email.as_str(), error = %e, "fan-out send failed");
                    SendReport {
                        recipient: email.clone(),
                        ok: false,
                        detail: e.to_string(),
                    }
                }
            };
            reports.push(report);
        }
        reports
    }

    async fn send_single(&self, request: SingleChatRequest) -> Result<(), RelayError> {
        let (status, ack) = self.post_api(SINGLE_CHAT_PATH, &request).await?;
        Self::check_send_status(SINGLE_CHAT_PATH, status, ack.code_str())
    }

    async fn send_group(&self, request: GroupChatRequest) -> Result<(), RelayError> {
        let (status, ack) = self.post_api(GROUP_CHAT_PATH, &request).await?;
        Self::check_send_status(GROUP_CHAT_PATH, status, ack.code_str())
    }

    fn check_send_status(
        path: &str,
        status: reqwest::StatusCode,
        code: Option<String>,
    ) -> Result<(), RelayError> {
        if !status.is_success() {
            return Err(RelayError::Transport {
                message: format!("POST {path} returned {status}"),
                source: None,
            });
        }
        // A 200 with a nonzero body code is a logical rejection the platform
        // does not retry; surface it in the logs but treat the delivery
        // attempt as done, matching the send endpoints' semantics.
        if let Some(code) = code
            && code != "0"
        {
            warn!(path, code = code.as_str(), "send acknowledged with nonzero code");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AUTH_PATH;
    use searelay_config::model::SeatalkConfig;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> SeatalkConfig {
        SeatalkConfig {
            base_url: base_url.to_string(),
            app_id: Some("app-1".into()),
            app_secret: Some("secret-1".into()),
            signing_secret: None,
            group_id: Some("g-1".into()),
            timeout_secs: 8,
        }
    }

    async fn mount_auth(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path(AUTH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 0,
                "app_access_token": "tok-1",
                "expire": 7200
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn group_text_send_posts_envelope() {
        let server = MockServer::start().await;
        mount_auth(&server).await;

        Mock::given(method("POST"))
            .and(path(GROUP_CHAT_PATH))
            .and(body_partial_json(serde_json::json!({
                "group_id": "g-1",
                "message": {"tag": "text", "text": {"content": "ping"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": 0})))
            .expect(1)
            .mount(&server)
            .await;

        let client = SeatalkClient::new(&test_config(&server.uri())).unwrap();
        client.send_text_to_group("g-1", "ping").await.unwrap();
    }

    #[tokio::test]
    async fn group_send_maps_non_2xx_to_transport() {
        let server = MockServer::start().await;
        mount_auth(&server).await;

        Mock::given(method("POST"))
            .and(path(GROUP_CHAT_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = SeatalkClient::new(&test_config(&server.uri())).unwrap();
        let err = client.send_text_to_group("g-1", "ping").await.unwrap_err();
        assert!(matches!(err, RelayError::Transport { .. }));
    }

    #[tokio::test]
    async fn resolve_employee_requires_active_status() {
        let server = MockServer::start().await;
        mount_auth(&server).await;

        Mock::given(method("POST"))
            .and(path(CONTACTS_PATH))
            .and(body_partial_json(serde_json::json!({"emails": ["gone@x.com"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 0,
                "employees": [
                    {"email": "gone@x.com", "employee_code": "e-2", "employee_status": 3}
                ]
            })))
            .mount(&server)
            .await;

        let client = SeatalkClient::new(&test_config(&server.uri())).unwrap();
        let err = client.resolve_employee("gone@x.com").await.unwrap_err();
        match err {
            RelayError::RecipientNotFound { recipient, reason } => {
                assert_eq!(recipient, "gone@x.com");
                assert!(reason.contains("not active"));
            }
            other => panic!("expected RecipientNotFound, got {other}"),
        }
    }

    #[tokio::test]
    async fn fanout_reports_per_recipient() {
        let server = MockServer::start().await;
        mount_auth(&server).await;

        // a@x.com resolves to an active employee.
        Mock::given(method("POST"))
            .and(path(CONTACTS_PATH))
            .and(body_partial_json(serde_json::json!({"emails": ["a@x.com"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 0,
                "employees": [
                    {"email": "a@x.com", "employee_code": "e-1", "employee_status": 2}
                ]
            })))
            .mount(&server)
            .await;

        // bad@x.com has no record.
        Mock::given(method("POST"))
            .and(path(CONTACTS_PATH))
            .and(body_partial_json(serde_json::json!({"emails": ["bad@x.com"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 0,
                "employees": []
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(SINGLE_CHAT_PATH))
            .and(body_partial_json(serde_json::json!({"employee_code": "e-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": 0})))
            .expect(1)
            .mount(&server)
            .await;

        let client = SeatalkClient::new(&test_config(&server.uri())).unwrap();
        let reports = client
            .send_text_fanout(&["a@x.com".to_string(), "bad@x.com".to_string()], "hi")
            .await;

        assert_eq!(reports.len(), 2);
        assert!(reports[0].ok);
        assert!(!reports[1].ok);
        assert!(reports[1].detail.contains("no matching employee"));
    }
}
