// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached app access token with expiry tracking.
//!
//! The cache holds at most one token behind an [`arc_swap::ArcSwapOption`].
//! There is deliberately no lock around refresh: concurrent callers that
//! both observe a stale token will both fetch a fresh one and the second
//! store wins. A redundant refresh is cheap and idempotent.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Tokens are treated as stale this many seconds before their advertised
/// expiry, so an outbound call never races the platform-side cutoff.
pub const TOKEN_SAFETY_MARGIN_SECS: u64 = 60;

/// Ttl assumed when the token endpoint omits one.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7200;

/// A bearer token with its absolute expiry time.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub value: String,
    /// Epoch seconds at which the platform invalidates the token.
    pub expires_at: u64,
}

impl CachedToken {
    /// Whether the token is still usable at `now`, honoring the safety margin.
    pub fn usable_at(&self, now: u64) -> bool {
        now < self.expires_at.saturating_sub(TOKEN_SAFETY_MARGIN_SECS)
    }
}

/// Process-wide single-token cache.
#[derive(Debug, Default)]
pub struct TokenCache {
    current: ArcSwapOption<CachedToken>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token value if it is still usable at `now`.
    pub fn get(&self, now: u64) -> Option<String> {
        let guard = self.current.load();
        guard
            .as_ref()
            .filter(|t| t.usable_at(now))
            .map(|t| t.value.clone())
    }

    /// Replaces the cached token with a fresh one fetched at `now`.
    pub fn store(&self, value: String, ttl_secs: u64, now: u64) {
        self.current.store(Some(Arc::new(CachedToken {
            value,
            expires_at: now + ttl_secs,
        })));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_yields_none() {
        let cache = TokenCache::new();
        assert!(cache.get(1_000).is_none());
    }

    #[test]
    fn token_reused_until_safety_margin() {
        let cache = TokenCache::new();
        let fetched_at = 1_000_000;
        cache.store("tok".into(), DEFAULT_TOKEN_TTL_SECS, fetched_at);

        // Usable right up to (but excluding) expiry minus the margin.
        assert_eq!(cache.get(fetched_at).as_deref(), Some("tok"));
        assert_eq!(
            cache.get(fetched_at + 7139).as_deref(),
            Some("tok"),
            "one second before the margin boundary"
        );
        assert!(
            cache.get(fetched_at + 7140).is_none(),
            "at ttl - margin the token must be refreshed"
        );
        assert!(cache.get(fetched_at + 7200).is_none());
    }

    #[test]
    fn store_replaces_previous_token() {
        let cache = TokenCache::new();
        cache.store("old".into(), 7200, 1_000);
        cache.store("new".into(), 7200, 2_000);
        assert_eq!(cache.get(2_000).as_deref(), Some("new"));
    }

    #[test]
    fn short_ttl_inside_margin_is_never_usable() {
        let cache = TokenCache::new();
        cache.store("tok".into(), 30, 1_000);
        assert!(cache.get(1_000).is_none());
    }
}
