//! Server-side set of logged-out tokens.
//!
//! Entries are keyed by token id (`jti`) and kept only until the token's own
//! expiry; after that the signature check rejects the token anyway.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

/// Revoked token ids mapped to the expiry of the token they belong to.
#[derive(Debug, Default)]
pub struct RevokedTokens {
    entries: DashMap<String, DateTime<Utc>>,
}

impl RevokedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a token id as revoked until `expires_at`.
    pub fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) {
        self.entries.insert(jti.to_string(), expires_at);
    }

    /// True when the token id was revoked and its entry has not lapsed at `now`.
    pub fn is_revoked(&self, jti: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .get(jti)
            .is_some_and(|expires_at| *expires_at > now)
    }

    /// Drop entries whose token has expired. Returns how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "Purged expired revocations");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
