//! HTTP pipeline shared by all services.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use meridian_core::ApiEnvelope;

use crate::endpoints;
use crate::error::ApiError;
use crate::services::{
    AddressService, AuthService, CartService, CatalogService, OrderService, PaymentService,
};
use crate::token::{AuthTokens, TokenCell, TokenGrant};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend API, e.g. `https://api.meridianshop.in/v1`.
    pub base_url: Url,
    /// Value for the `User-Agent` header.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a config with the default user agent.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            user_agent: concat!("meridian-client/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Client for the commerce backend REST API.
///
/// Cheaply cloneable via `Arc`. One client corresponds to one customer
/// session: the token pair lives inside and rotates in place when the
/// backend rejects an expired access token.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    user_agent: String,
    tokens: TokenCell,
}

impl Client {
    /// Create an unauthenticated client (catalog browsing, login).
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::build(config, None)
    }

    /// Create a client holding an existing token pair (e.g. restored
    /// from a session).
    #[must_use]
    pub fn with_tokens(config: ClientConfig, tokens: AuthTokens) -> Self {
        Self::build(config, Some(tokens))
    }

    fn build(config: ClientConfig, tokens: Option<AuthTokens>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http: reqwest::Client::new(),
                base_url: config.base_url,
                user_agent: config.user_agent,
                tokens: TokenCell::new(tokens),
            }),
        }
    }

    /// Whether a token pair is currently held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.tokens.tokens().is_some()
    }

    /// Snapshot of the held token pair, for persisting to a session.
    #[must_use]
    pub fn tokens(&self) -> Option<AuthTokens> {
        self.inner.tokens.tokens()
    }

    /// Generation counter for the token pair. Advances on every
    /// rotation or clear; callers compare snapshots to detect rotation.
    #[must_use]
    pub fn token_generation(&self) -> u64 {
        self.inner.tokens.generation()
    }

    pub(crate) fn store_tokens(&self, tokens: AuthTokens) {
        self.inner.tokens.store(tokens);
    }

    pub(crate) fn clear_tokens(&self) {
        self.inner.tokens.clear();
    }

    // ─────────────────────────────────────────────────────────────────
    // Services
    // ─────────────────────────────────────────────────────────────────

    /// Authentication and profile operations.
    #[must_use]
    pub const fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    /// Product and category reads.
    #[must_use]
    pub const fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self)
    }

    /// Cart operations.
    #[must_use]
    pub const fn cart(&self) -> CartService<'_> {
        CartService::new(self)
    }

    /// Order placement and tracking.
    #[must_use]
    pub const fn orders(&self) -> OrderService<'_> {
        OrderService::new(self)
    }

    /// Address book operations.
    #[must_use]
    pub const fn addresses(&self) -> AddressService<'_> {
        AddressService::new(self)
    }

    /// Payment gateway handoff operations.
    #[must_use]
    pub const fn payments(&self) -> PaymentService<'_> {
        PaymentService::new(self)
    }

    // ─────────────────────────────────────────────────────────────────
    // Request pipeline
    // ─────────────────────────────────────────────────────────────────

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&Value>,
        access_token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut request = self
            .inner
            .http
            .request(method.clone(), self.url_for(path))
            .header("User-Agent", &self.inner.user_agent)
            .header("Accept", "application/json");

        if let Some(pairs) = query {
            request = request.query(pairs);
        }
        if let Some(json) = body {
            request = request.json(json);
        }
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        Ok(request.send().await?)
    }

    /// Send a request, refreshing the token pair once if the backend
    /// rejects the access token.
    async fn execute_raw(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&Value>,
    ) -> Result<String, ApiError> {
        let (access, observed_generation) = self.inner.tokens.snapshot();
        let sent_token = access.is_some();
        let response = self
            .send_once(&method, path, query, body, access.as_deref())
            .await?;

        // A 401 means "refresh and replay" only when an access token was
        // actually sent; a tokenless 401 (bad login, protected endpoint
        // hit anonymously) is an ordinary error with a backend message.
        let response = if response.status() == StatusCode::UNAUTHORIZED && sent_token {
            let fresh = self.refresh_after_unauthorized(observed_generation).await?;
            let retry = self
                .send_once(&method, path, query, body, Some(&fresh))
                .await?;
            if retry.status() == StatusCode::UNAUTHORIZED {
                // The rotated token was rejected too; give up on the pair.
                self.inner.tokens.clear();
                return Err(ApiError::SessionExpired);
            }
            retry
        } else {
            response
        };

        Self::success_body(response).await
    }

    /// Map a response to its body text, or to an error for non-2xx.
    async fn success_body(response: Response) -> Result<String, ApiError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let text = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(
                extract_message(&text).unwrap_or_else(|| "resource".to_owned()),
            ));
        }

        if !status.is_success() {
            let message =
                extract_message(&text).unwrap_or_else(|| format!("HTTP {status}"));
            warn!(status = %status, message = %message, "backend rejected request");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }

    /// Execute and unwrap the `{ data, message }` envelope.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let text = self.execute_raw(method, path, query, body).await?;
        match serde_json::from_str::<ApiEnvelope<T>>(&text) {
            Ok(envelope) => Ok(envelope.data),
            Err(e) => {
                error!(
                    error = %e,
                    body = %text.chars().take(500).collect::<String>(),
                    "failed to parse backend response"
                );
                Err(ApiError::Decode(e))
            }
        }
    }

    /// Execute and discard the response body.
    pub(crate) async fn request_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(), ApiError> {
        self.execute_raw(method, path, None, body).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────
    // Token refresh
    // ─────────────────────────────────────────────────────────────────

    /// Obtain a valid access token after a 401, performing at most one
    /// refresh per expired token.
    ///
    /// All requests that observed the rejected token queue here. The
    /// first through the gate refreshes; the rest see the generation
    /// counter has advanced and replay with the rotated token.
    async fn refresh_after_unauthorized(
        &self,
        observed_generation: u64,
    ) -> Result<String, ApiError> {
        let _gate = self.inner.tokens.refresh_gate.lock().await;

        if self.inner.tokens.generation() != observed_generation {
            // Another request already rotated (or cleared) the pair.
            return match self.inner.tokens.snapshot().0 {
                Some(access) => Ok(access),
                None => Err(ApiError::SessionExpired),
            };
        }

        let Some(refresh_token) = self.inner.tokens.refresh_token() else {
            return Err(ApiError::Unauthenticated);
        };

        debug!("access token rejected, refreshing");

        let body = serde_json::json!({ "refresh_token": refresh_token });
        let response = self
            .inner
            .http
            .post(self.url_for(endpoints::AUTH_REFRESH))
            .header("User-Agent", &self.inner.user_agent)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "token refresh rejected, clearing credentials");
            self.inner.tokens.clear();
            return Err(ApiError::SessionExpired);
        }

        let text = response.text().await?;
        let envelope: ApiEnvelope<TokenGrant> = serde_json::from_str(&text)?;
        let grant = envelope.data;

        // The backend may or may not rotate the refresh token.
        let tokens = AuthTokens::new(
            grant.access_token,
            grant.refresh_token.unwrap_or(refresh_token),
            grant.expires_in,
        );
        let access = tokens.access_token.clone();
        self.inner.tokens.store(tokens);

        Ok(access)
    }
}

/// Pull the `message` field out of an error body, if there is one.
fn extract_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(r#"{"message": "Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert!(extract_message(r#"{"message": ""}"#).is_none());
        assert!(extract_message("not json").is_none());
        assert!(extract_message(r#"{"other": 1}"#).is_none());
    }

    #[test]
    fn test_url_for_normalizes_slashes() {
        let config = ClientConfig::new("https://api.example.com/v1/".parse().expect("valid url"));
        let client = Client::new(config);
        assert_eq!(
            client.url_for("auth/login"),
            "https://api.example.com/v1/auth/login"
        );
    }
}
