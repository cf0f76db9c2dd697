// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the searelay relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level searelay configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Bind address and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// SeaTalk OpenAPI credentials and endpoints.
    #[serde(default)]
    pub seatalk: SeatalkConfig,

    /// Inbound callback handling policy.
    #[serde(default)]
    pub callback: CallbackConfig,

    /// Legacy-endpoint forwarding settings.
    #[serde(default)]
    pub forward: ForwardConfig,

    /// External append-log sink settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// HTTP service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// SeaTalk OpenAPI configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SeatalkConfig {
    /// OpenAPI base URL. Overridable so tests can point at a mock server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Application id. `None` disables outbound calls.
    #[serde(default)]
    pub app_id: Option<String>,

    /// Application secret paired with `app_id`.
    #[serde(default)]
    pub app_secret: Option<String>,

    /// Webhook signing secret. `None` skips signature verification
    /// entirely (open deployment; the challenge flow predates secret
    /// provisioning on some tenants).
    #[serde(default)]
    pub signing_secret: Option<String>,

    /// Default group chat id for group sends and click fallbacks.
    #[serde(default)]
    pub group_id: Option<String>,

    /// Timeout applied to every outbound OpenAPI call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SeatalkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_id: None,
            app_secret: None,
            signing_secret: None,
            group_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://openapi.seatalk.io".to_string()
}

fn default_timeout_secs() -> u64 {
    8
}

/// Inbound callback policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CallbackConfig {
    /// Reject signature mismatches with 403. When false, mismatches are
    /// logged and processing continues (degraded/legacy tenants).
    #[serde(default = "default_reject_on_mismatch")]
    pub reject_on_mismatch: bool,

    /// Capacity of the recent-event-id dedup window.
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            reject_on_mismatch: default_reject_on_mismatch(),
            dedup_capacity: default_dedup_capacity(),
        }
    }
}

fn default_reject_on_mismatch() -> bool {
    true
}

fn default_dedup_capacity() -> usize {
    512
}

/// Legacy-endpoint forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ForwardConfig {
    /// URL to re-post raw webhook bodies to. `None` disables forwarding.
    #[serde(default)]
    pub url: Option<String>,

    /// Maximum concurrent in-flight forwards. Deliveries beyond the limit
    /// are dropped, not queued (no-retry policy).
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_in_flight: default_max_in_flight(),
        }
    }
}

fn default_max_in_flight() -> usize {
    4
}

/// External append-log sink configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// URL accepting appended log rows as JSON. `None` disables the sink.
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_platform_expectations() {
        let config = RelayConfig::default();
        assert_eq!(config.service.port, 10000);
        assert_eq!(config.seatalk.base_url, "https://openapi.seatalk.io");
        assert_eq!(config.seatalk.timeout_secs, 8);
        assert_eq!(config.callback.dedup_capacity, 512);
        assert!(config.callback.reject_on_mismatch);
        assert!(config.forward.url.is_none());
        assert!(config.audit.url.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml_str = r#"
[seatalk]
app_id = "a1"
signing_secrt = "oops"
"#;
        assert!(toml::from_str::<RelayConfig>(toml_str).is_err());
    }
}
