//! Error taxonomy for backend API calls.

use thiserror::Error;

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status with a message.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or a generic fallback.
        message: String,
    },

    /// Response body did not match the expected envelope.
    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// No credentials are held and the endpoint requires them.
    #[error("not authenticated")]
    Unauthenticated,

    /// The token pair could not be refreshed; credentials were cleared.
    #[error("session expired")]
    SessionExpired,

    /// Rate limited by the backend.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl ApiError {
    /// Whether this error should clear stored credentials and force a
    /// redirect to the login page.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::SessionExpired)
    }

    /// A message safe to render to the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::NotFound(what) => format!("{what} was not found"),
            Self::Unauthenticated | Self::SessionExpired => {
                "Please sign in to continue".to_owned()
            }
            Self::RateLimited(_) => "Too many requests, please slow down".to_owned(),
            Self::Http(_) | Self::Decode(_) => {
                "Something went wrong, please try again".to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_login() {
        assert!(ApiError::SessionExpired.requires_login());
        assert!(ApiError::Unauthenticated.requires_login());
        assert!(
            !ApiError::Status {
                status: 422,
                message: "invalid".to_owned()
            }
            .requires_login()
        );
    }

    #[test]
    fn test_user_message_prefers_backend_message() {
        let err = ApiError::Status {
            status: 422,
            message: "Quantity exceeds stock".to_owned(),
        };
        assert_eq!(err.user_message(), "Quantity exceeds stock");
    }
}
