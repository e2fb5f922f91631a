//! Token pair storage and the refresh gate.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// An access/refresh token pair issued by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthTokens {
    /// Short-lived bearer token sent on every request.
    pub access_token: String,
    /// Long-lived token exchanged for a new pair when the access token
    /// expires.
    pub refresh_token: String,
    /// Seconds until the access token expires, if the backend says.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Unix timestamp when this pair was obtained.
    pub obtained_at: i64,
}

impl AuthTokens {
    /// Build a pair stamped with the current time.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String, expires_in: Option<i64>) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            obtained_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Wire shape of the token grant inside login/register/refresh
/// responses. The backend may omit `refresh_token` when it does not
/// rotate it.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Shared token state for a client.
///
/// The generation counter advances on every store or clear. A request
/// that hit a 401 remembers the generation it sent with; once through
/// the refresh gate, a generation mismatch means another task already
/// rotated (or cleared) the pair and no second refresh call is needed.
pub(crate) struct TokenCell {
    state: RwLock<Option<AuthTokens>>,
    generation: AtomicU64,
    /// Serializes refresh attempts. Held only across the refresh HTTP
    /// call, never across ordinary requests.
    pub(crate) refresh_gate: Mutex<()>,
}

impl TokenCell {
    pub(crate) fn new(tokens: Option<AuthTokens>) -> Self {
        Self {
            state: RwLock::new(tokens),
            generation: AtomicU64::new(0),
            refresh_gate: Mutex::new(()),
        }
    }

    /// The access token to send, plus the generation it belongs to.
    pub(crate) fn snapshot(&self) -> (Option<String>, u64) {
        let generation = self.generation.load(Ordering::Acquire);
        let access = self
            .state
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|t| t.access_token.clone()));
        (access, generation)
    }

    /// The refresh token, if a pair is held.
    pub(crate) fn refresh_token(&self) -> Option<String> {
        self.state
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|t| t.refresh_token.clone()))
    }

    /// Full pair snapshot, for persisting back into a session.
    pub(crate) fn tokens(&self) -> Option<AuthTokens> {
        self.state.read().ok().and_then(|guard| guard.clone())
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Store a rotated pair and advance the generation.
    pub(crate) fn store(&self, tokens: AuthTokens) {
        if let Ok(mut guard) = self.state.write() {
            *guard = Some(tokens);
        }
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Drop the pair (failed refresh or logout) and advance the
    /// generation so queued requests stop retrying with it.
    pub(crate) fn clear(&self) {
        if let Ok(mut guard) = self.state.write() {
            *guard = None;
        }
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(access: &str) -> AuthTokens {
        AuthTokens::new(access.to_owned(), "refresh".to_owned(), Some(900))
    }

    #[test]
    fn test_snapshot_tracks_generation() {
        let cell = TokenCell::new(None);
        let (access, generation) = cell.snapshot();
        assert!(access.is_none());
        assert_eq!(generation, 0);

        cell.store(pair("a1"));
        let (access, generation) = cell.snapshot();
        assert_eq!(access.as_deref(), Some("a1"));
        assert_eq!(generation, 1);
    }

    #[test]
    fn test_clear_advances_generation() {
        let cell = TokenCell::new(Some(pair("a1")));
        cell.clear();
        assert_eq!(cell.generation(), 1);
        assert!(cell.tokens().is_none());
        assert!(cell.refresh_token().is_none());
    }
}
