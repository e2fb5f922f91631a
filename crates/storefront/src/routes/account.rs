//! Account overview and profile updates.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use meridian_client::services::ProfileUpdate;
use meridian_core::{Order, Phone, User};

use crate::error::Result;
use crate::filters;
use crate::middleware::{ApiContext, RequireAuth, set_current_user};
use crate::models::{flash_error, flash_success};
use crate::routes::PageContext;
use crate::state::AppState;

/// How many recent orders the overview shows.
const RECENT_ORDERS: usize = 5;

/// Profile update form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account/show.html")]
pub struct AccountTemplate {
    pub ctx: PageContext,
    pub profile: User,
    pub recent_orders: Vec<Order>,
}

/// Display the account overview: fresh profile plus recent orders.
///
/// Profile and orders are independent reads, fetched concurrently
/// through the shared per-request client.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    api: ApiContext,
) -> Result<AccountTemplate> {
    let client = api.client();
    let auth_svc = client.auth();
    let orders_svc = client.orders();
    let (profile, orders) = tokio::join!(auth_svc.me(), orders_svc.list());
    let profile = profile?;
    let mut orders = orders?;
    api.persist().await?;

    // Refresh the cached profile; the backend copy wins.
    set_current_user(&session, &profile).await?;

    orders.truncate(RECENT_ORDERS);

    Ok(AccountTemplate {
        ctx: PageContext::build(&state, &session, Some(user)).await,
        profile,
        recent_orders: orders,
    })
}

/// Update the profile.
#[instrument(skip_all)]
pub async fn update_profile(
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
    Form(form): Form<ProfileForm>,
) -> Result<Redirect> {
    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        flash_error(&session, "Please fill in your first and last name").await?;
        return Ok(Redirect::to("/account"));
    }

    let phone = match form.phone.trim() {
        "" => None,
        raw => match Phone::parse(raw) {
            Ok(phone) => Some(phone),
            Err(e) => {
                flash_error(&session, format!("Invalid phone number: {e}")).await?;
                return Ok(Redirect::to("/account"));
            }
        },
    };

    let profile = api
        .client()
        .auth()
        .update_profile(&ProfileUpdate {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone,
        })
        .await?;
    api.persist().await?;

    set_current_user(&session, &profile).await?;
    flash_success(&session, "Profile updated").await?;
    Ok(Redirect::to("/account"))
}
