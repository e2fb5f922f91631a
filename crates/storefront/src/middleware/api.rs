//! Per-request API client bound to session tokens.
//!
//! The browser app kept one API client per tab with tokens in local
//! storage; here each request builds a client from the session's token
//! pair. Handlers that fan out with `tokio::join!` share the client, so
//! an expired access token still produces a single refresh. After the
//! work, [`ApiContext::persist`] writes a rotated (or cleared) pair back
//! into the session.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use tower_sessions::Session;

use meridian_client::{AuthTokens, Client};

use crate::error::AppError;
use crate::models::session_keys;
use crate::state::AppState;

/// A per-request API client plus the session it was restored from.
pub struct ApiContext {
    client: Client,
    session: Session,
}

impl ApiContext {
    /// The API client for this request.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Write the token pair back into the session if it rotated during
    /// this request. A cleared pair removes the stored credentials and
    /// the cached profile with them.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn persist(&self) -> Result<(), AppError> {
        // Generation 0 means the pair never changed since restore.
        if self.client.token_generation() == 0 {
            return Ok(());
        }

        match self.client.tokens() {
            Some(tokens) => {
                self.session
                    .insert(session_keys::AUTH_TOKENS, tokens)
                    .await?;
            }
            None => {
                self.session
                    .remove::<AuthTokens>(session_keys::AUTH_TOKENS)
                    .await?;
                self.session
                    .remove::<meridian_core::User>(session_keys::CURRENT_USER)
                    .await?;
            }
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for ApiContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let tokens: Option<AuthTokens> = session
            .get(session_keys::AUTH_TOKENS)
            .await
            .ok()
            .flatten();

        Ok(Self {
            client: state.api_client(tokens),
            session,
        })
    }
}
