//! Authentication and profile operations.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use meridian_core::{Email, Phone, User};

use crate::client::Client;
use crate::endpoints;
use crate::error::ApiError;
use crate::token::{AuthTokens, TokenGrant};

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    pub email: Email,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
}

/// Payload for `PATCH /auth/me`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
}

/// A successful login or registration: the user record plus the token
/// pair now held by the client.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub tokens: AuthTokens,
}

#[derive(Debug, Deserialize)]
struct SessionData {
    user: User,
    #[serde(flatten)]
    grant: TokenGrant,
}

/// Authentication operations.
pub struct AuthService<'a> {
    client: &'a Client,
}

impl<'a> AuthService<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create an account and store the issued token pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the payload fails
    /// backend validation.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn register(&self, payload: &RegisterPayload) -> Result<AuthSession, ApiError> {
        let body = serde_json::to_value(payload)?;
        let data: SessionData = self
            .client
            .request_json(Method::POST, endpoints::AUTH_REGISTER, None, Some(&body))
            .await?;
        Ok(self.adopt(data))
    }

    /// Exchange credentials for a token pair and store it.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<AuthSession, ApiError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });
        let data: SessionData = self
            .client
            .request_json(Method::POST, endpoints::AUTH_LOGIN, None, Some(&body))
            .await?;
        Ok(self.adopt(data))
    }

    /// Invalidate the refresh token server-side and drop the pair.
    ///
    /// The local pair is cleared even if the backend call fails; a dead
    /// refresh token is not worth keeping.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self
            .client
            .request_empty(Method::POST, endpoints::AUTH_LOGOUT, None)
            .await;
        self.client.clear_tokens();
        result
    }

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the session expired.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User, ApiError> {
        self.client
            .request_json(Method::GET, endpoints::AUTH_ME, None, None)
            .await
    }

    /// Update the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails backend validation.
    #[instrument(skip(self, payload))]
    pub async fn update_profile(&self, payload: &ProfileUpdate) -> Result<User, ApiError> {
        let body = serde_json::to_value(payload)?;
        self.client
            .request_json(Method::PATCH, endpoints::AUTH_ME, None, Some(&body))
            .await
    }

    fn adopt(&self, data: SessionData) -> AuthSession {
        let tokens = AuthTokens::new(
            data.grant.access_token,
            data.grant.refresh_token.unwrap_or_default(),
            data.grant.expires_in,
        );
        self.client.store_tokens(tokens.clone());
        AuthSession {
            user: data.user,
            tokens,
        }
    }
}
