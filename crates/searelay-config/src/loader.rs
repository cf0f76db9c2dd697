// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./searelay.toml` > `~/.config/searelay/searelay.toml`
//! > `/etc/searelay/searelay.toml` with environment variable overrides via
//! `SEARELAY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RelayConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/searelay/searelay.toml` (system-wide)
/// 3. `~/.config/searelay/searelay.toml` (user XDG config)
/// 4. `./searelay.toml` (local directory)
/// 5. `SEARELAY_*` environment variables
pub fn load_config() -> Result<RelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::file("/etc/searelay/searelay.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("searelay/searelay.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("searelay.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<RelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SEARELAY_SEATALK_SIGNING_SECRET` must
/// map to `seatalk.signing_secret`, not `seatalk.signing.secret`.
fn env_provider() -> Env {
    Env::prefixed("SEARELAY_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: SEARELAY_SEATALK_APP_SECRET -> "seatalk_app_secret"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("seatalk_", "seatalk.", 1)
            .replacen("callback_", "callback.", 1)
            .replacen("forward_", "forward.", 1)
            .replacen("audit_", "audit.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[service]
port = 8080

[seatalk]
app_id = "a1"
app_secret = "s1"
"#,
        )
        .unwrap();
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.seatalk.app_id.as_deref(), Some("a1"));
        // Untouched sections keep their defaults.
        assert_eq!(config.seatalk.timeout_secs, 8);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.service.host, "0.0.0.0");
        assert!(config.seatalk.signing_secret.is_none());
    }
}
