// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the SeaTalk OpenAPI.
//!
//! Provides [`SeatalkClient`] which handles request construction, bearer
//! authentication via the token cache, and uniform transport error mapping.
//! The base URL comes from configuration so tests can point the client at a
//! mock server.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use searelay_config::model::SeatalkConfig;
use searelay_core::RelayError;
use serde::Serialize;
use tracing::debug;

use crate::token::TokenCache;
use crate::types::{ApiAck, AuthRequest, AuthResponse};

/// Path of the credentials-for-token exchange endpoint.
pub(crate) const AUTH_PATH: &str = "/auth/app_access_token";

/// HTTP client for SeaTalk OpenAPI communication.
#[derive(Debug)]
pub struct SeatalkClient {
    http: reqwest::Client,
    base_url: String,
    app_id: Option<String>,
    app_secret: Option<String>,
    default_group: Option<String>,
    token_cache: TokenCache,
}

impl SeatalkClient {
    /// Creates a new client from the `[seatalk]` config section.
    ///
    /// Credentials may be absent; calls that need a token fail with a
    /// `Config` error at call time instead.
    pub fn new(config: &SeatalkConfig) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RelayError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id: config.app_id.clone(),
            app_secret: config.app_secret.clone(),
            default_group: config.group_id.clone(),
            token_cache: TokenCache::new(),
        })
    }

    /// The configured default group chat id, if any.
    pub fn default_group(&self) -> Option<&str> {
        self.default_group.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Returns a usable bearer token, refreshing through the auth endpoint
    /// when the cached one is stale.
    pub async fn get_token(&self) -> Result<String, RelayError> {
        let (app_id, app_secret) = match (&self.app_id, &self.app_secret) {
            (Some(id), Some(secret)) => (id.clone(), secret.clone()),
            _ => {
                return Err(RelayError::Config(
                    "seatalk.app_id/seatalk.app_secret are required for outbound calls"
                        .into(),
                ));
            }
        };

        let now = epoch_secs();
        if let Some(token) = self.token_cache.get(now) {
            return Ok(token);
        }

        debug!("token cache stale, refreshing");
        let response = self
            .http
            .post(self.url(AUTH_PATH))
            .json(&AuthRequest { app_id, app_secret })
            .send()
            .await
            .map_err(|e| RelayError::Auth {
                message: format!("token request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body: AuthResponse = response.json().await.map_err(|e| RelayError::Auth {
            message: format!("token response unreadable (status {status}): {e}"),
            source: Some(Box::new(e)),
        })?;

        let token = body.token().ok_or_else(|| RelayError::Auth {
            message: format!("token endpoint returned no access token (status {status})"),
            source: None,
        })?;

        self.token_cache.store(token.to_string(), body.ttl_secs(), now);
        Ok(token.to_string())
    }

    /// POSTs `body` to an authenticated endpoint with an explicit token and
    /// returns the raw response for callers that need a typed body.
    pub(crate) async fn http_post_json<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<reqwest::Response, RelayError> {
        self.http
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| RelayError::Transport {
                message: format!("POST {path} failed: {e}"),
                source: Some(Box::new(e)),
            })
    }

    /// POSTs `body` to an authenticated endpoint and returns the HTTP status
    /// together with the leniently-parsed `{code, message}` acknowledgement.
    ///
    /// Connection-level failures map to `Transport`; non-2xx statuses are
    /// returned to the caller, which decides whether they are fatal (sends)
    /// or part of a fallback protocol (card updates).
    pub(crate) async fn post_api<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(reqwest::StatusCode, ApiAck), RelayError> {
        let token = self.get_token().await?;
        let response = self.http_post_json(path, &token, body).await?;

        let status = response.status();
        let ack = response.json::<ApiAck>().await.unwrap_or_default();
        debug!(path, status = %status, code = ?ack.code_str(), "openapi response");
        Ok((status, ack))
    }
}

/// Current time as epoch seconds.
fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
