//! Login, registration, and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument};

use meridian_client::AuthTokens;
use meridian_client::services::RegisterPayload;
use meridian_core::{Email, Phone};

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{ApiContext, clear_current_user, set_current_user};
use crate::models::{flash_error, flash_success, session_keys};
use crate::routes::PageContext;
use crate::state::AppState;

/// Minimum password length, matching the backend's policy.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Login page query parameters.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Set by the expired-session redirect.
    pub expired: Option<u8>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
}

/// Display the login page.
///
/// When the expired-session redirect lands here, the stale credentials
/// are dropped before the form renders.
#[instrument(skip(state, session))]
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LoginQuery>,
) -> Result<LoginTemplate> {
    if query.expired.is_some() {
        session
            .remove::<AuthTokens>(session_keys::AUTH_TOKENS)
            .await?;
        clear_current_user(&session).await?;
        clear_sentry_user();
        flash_error(&session, "Your session has expired. Please sign in again.").await?;
    }

    Ok(LoginTemplate {
        ctx: PageContext::build(&state, &session, None).await,
    })
}

/// Handle a login attempt.
#[instrument(skip_all)]
pub async fn login(
    session: Session,
    api: ApiContext,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let email = match Email::parse(form.email.trim()) {
        Ok(email) => email,
        Err(e) => {
            flash_error(&session, format!("Invalid email address: {e}")).await?;
            return Ok(Redirect::to("/auth/login"));
        }
    };

    match api.client().auth().login(&email, &form.password).await {
        Ok(auth) => {
            session
                .insert(session_keys::AUTH_TOKENS, &auth.tokens)
                .await?;
            set_current_user(&session, &auth.user).await?;
            set_sentry_user(&auth.user.id, Some(auth.user.email.as_str()));
            info!(user_id = %auth.user.id, "customer signed in");

            flash_success(&session, format!("Welcome back, {}!", auth.user.first_name)).await?;
            Ok(Redirect::to("/"))
        }
        Err(e) => {
            flash_error(&session, e.user_message()).await?;
            Ok(Redirect::to("/auth/login"))
        }
    }
}

/// Display the registration page.
#[instrument(skip_all)]
pub async fn register_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<RegisterTemplate> {
    Ok(RegisterTemplate {
        ctx: PageContext::build(&state, &session, None).await,
    })
}

/// Handle a registration attempt.
#[instrument(skip_all)]
pub async fn register(
    session: Session,
    api: ApiContext,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect> {
    let email = match Email::parse(form.email.trim()) {
        Ok(email) => email,
        Err(e) => {
            flash_error(&session, format!("Invalid email address: {e}")).await?;
            return Ok(Redirect::to("/auth/register"));
        }
    };

    if form.password.len() < MIN_PASSWORD_LENGTH {
        flash_error(
            &session,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        )
        .await?;
        return Ok(Redirect::to("/auth/register"));
    }

    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        flash_error(&session, "Please fill in your first and last name").await?;
        return Ok(Redirect::to("/auth/register"));
    }

    let phone = match form.phone.trim() {
        "" => None,
        raw => match Phone::parse(raw) {
            Ok(phone) => Some(phone),
            Err(e) => {
                flash_error(&session, format!("Invalid phone number: {e}")).await?;
                return Ok(Redirect::to("/auth/register"));
            }
        },
    };

    let payload = RegisterPayload {
        email,
        password: form.password,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        phone,
    };

    match api.client().auth().register(&payload).await {
        Ok(auth) => {
            session
                .insert(session_keys::AUTH_TOKENS, &auth.tokens)
                .await?;
            set_current_user(&session, &auth.user).await?;
            set_sentry_user(&auth.user.id, Some(auth.user.email.as_str()));
            info!(user_id = %auth.user.id, "customer registered");

            flash_success(
                &session,
                format!("Welcome to the shop, {}!", auth.user.first_name),
            )
            .await?;
            Ok(Redirect::to("/"))
        }
        Err(e) => {
            flash_error(&session, e.user_message()).await?;
            Ok(Redirect::to("/auth/register"))
        }
    }
}

/// Sign out: revoke the refresh token and drop the whole session.
#[instrument(skip_all)]
pub async fn logout(session: Session, api: ApiContext) -> Result<Redirect> {
    // Best effort; a dead refresh token is not worth keeping the
    // customer signed in for.
    if let Err(e) = api.client().auth().logout().await {
        tracing::warn!(error = %e, "backend logout failed");
    }

    session.clear().await;
    clear_sentry_user();

    flash_success(&session, "You have been signed out").await?;
    Ok(Redirect::to("/"))
}
