//! Session keys and flash notices.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session keys for persisted state.
///
/// These are the storefront's equivalent of the browser app's local
/// storage keys: the token pair, the cached profile, plus the checkout
/// wizard state and the one-shot flash notice.
pub mod session_keys {
    /// Key for the backend token pair.
    pub const AUTH_TOKENS: &str = "auth_tokens";

    /// Key for the cached user profile.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the checkout wizard state.
    pub const CHECKOUT: &str = "checkout";

    /// Key for the one-shot flash notice.
    pub const FLASH: &str = "flash";
}

/// Visual style of a flash notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

/// A one-shot notice rendered on the next page view.
///
/// This is the server-side rendition of the client stores'
/// auto-clearing notification timers: set on mutation, consumed by the
/// next render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    /// CSS class suffix for the banner.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "flash-success",
            FlashKind::Error => "flash-error",
        }
    }
}

/// Queue a success notice for the next page view.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn flash_success(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    set_flash(session, FlashKind::Success, message).await
}

/// Queue an error notice for the next page view.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn flash_error(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    set_flash(session, FlashKind::Error, message).await
}

async fn set_flash(
    session: &Session,
    kind: FlashKind,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(
            session_keys::FLASH,
            Flash {
                kind,
                message: message.into(),
            },
        )
        .await
}

/// Take the pending flash notice, clearing it from the session.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}
