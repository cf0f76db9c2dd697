// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, URL schemes, and sane limits.

use crate::diagnostic::ConfigError;
use crate::model::RelayConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.service.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "service.host `{host}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    if config.seatalk.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "seatalk.timeout_secs must be at least 1".to_string(),
        });
    }

    // App id and secret only make sense together.
    if config.seatalk.app_id.is_some() != config.seatalk.app_secret.is_some() {
        errors.push(ConfigError::Validation {
            message: "seatalk.app_id and seatalk.app_secret must be set together"
                .to_string(),
        });
    }

    if config.callback.dedup_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "callback.dedup_capacity must be at least 1".to_string(),
        });
    }

    if config.forward.max_in_flight == 0 {
        errors.push(ConfigError::Validation {
            message: "forward.max_in_flight must be at least 1".to_string(),
        });
    }

    for (key, url) in [
        ("seatalk.base_url", Some(&config.seatalk.base_url)),
        ("forward.url", config.forward.url.as_ref()),
        ("audit.url", config.audit.url.as_ref()),
    ] {
        if let Some(url) = url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{url}` must start with http:// or https://"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = RelayConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_host_fails_validation() {
        let mut config = RelayConfig::default();
        config.service.host = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("service.host"))));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let mut config = RelayConfig::default();
        config.seatalk.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("timeout_secs"))));
    }

    #[test]
    fn app_id_without_secret_fails_validation() {
        let mut config = RelayConfig::default();
        config.seatalk.app_id = Some("a1".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("set together"))));
    }

    #[test]
    fn non_http_forward_url_fails_validation() {
        let mut config = RelayConfig::default();
        config.forward.url = Some("ftp://legacy.internal/hook".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("forward.url"))));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = RelayConfig::default();
        config.service.host = "127.0.0.1".to_string();
        config.seatalk.app_id = Some("a1".to_string());
        config.seatalk.app_secret = Some("s1".to_string());
        config.forward.url = Some("https://legacy.internal/hook".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
