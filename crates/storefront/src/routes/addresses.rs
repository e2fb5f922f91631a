//! Address book management.
//!
//! Malformed postal codes and phone numbers are rejected here, before a
//! request is ever sent; the backend re-validates everything anyway.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use meridian_client::services::AddressPayload;
use meridian_core::{Address, AddressId, AddressKind, Phone, PostalCode};

use crate::error::Result;
use crate::filters;
use crate::middleware::{ApiContext, RequireAuth};
use crate::models::{flash_error, flash_success};
use crate::routes::PageContext;
use crate::state::AppState;

/// Address create/update form data.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressForm {
    pub kind: String,
    pub full_name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
    pub is_default: Option<String>,
}

impl AddressForm {
    /// Validate the form into an API payload, or a message for the
    /// customer.
    fn validate(&self) -> std::result::Result<AddressPayload, String> {
        let kind = match self.kind.as_str() {
            "shipping" => AddressKind::Shipping,
            "billing" => AddressKind::Billing,
            _ => return Err("Unknown address type".to_string()),
        };

        let full_name = self.full_name.trim();
        let line1 = self.line1.trim();
        let city = self.city.trim();
        let state = self.state.trim();
        if full_name.is_empty() || line1.is_empty() || city.is_empty() || state.is_empty() {
            return Err("Please fill in name, address, city, and state".to_string());
        }

        let postal_code = PostalCode::parse(&self.postal_code)
            .map_err(|e| format!("Invalid PIN code: {e}"))?;
        let phone = Phone::parse(&self.phone).map_err(|e| format!("Invalid phone number: {e}"))?;

        Ok(AddressPayload {
            kind,
            full_name: full_name.to_string(),
            line1: line1.to_string(),
            line2: self
                .line2
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(ToOwned::to_owned),
            city: city.to_string(),
            state: state.to_string(),
            postal_code,
            phone,
            is_default: self.is_default.is_some(),
        })
    }
}

/// Address book template.
#[derive(Template, WebTemplate)]
#[template(path = "account/addresses/index.html")]
pub struct AddressIndexTemplate {
    pub ctx: PageContext,
    pub shipping: Vec<Address>,
    pub billing: Vec<Address>,
}

impl AddressIndexTemplate {
    async fn build(
        state: &AppState,
        session: &Session,
        user: meridian_core::User,
        addresses: Vec<Address>,
    ) -> Self {
        let (shipping, billing) = addresses
            .into_iter()
            .partition(|address| address.kind == AddressKind::Shipping);

        Self {
            ctx: PageContext::build(state, session, Some(user)).await,
            shipping,
            billing,
        }
    }
}

/// Address form template (new and edit).
#[derive(Template, WebTemplate)]
#[template(path = "account/addresses/form.html")]
pub struct AddressFormTemplate {
    pub ctx: PageContext,
    /// `None` for a new address, `Some` when editing.
    pub editing: Option<AddressId>,
    pub kind: String,
    pub full_name: String,
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
    pub is_default: bool,
}

impl AddressFormTemplate {
    fn blank(ctx: PageContext) -> Self {
        Self {
            ctx,
            editing: None,
            kind: "shipping".to_string(),
            full_name: String::new(),
            line1: String::new(),
            line2: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            phone: String::new(),
            is_default: false,
        }
    }

    fn for_address(ctx: PageContext, address: &Address) -> Self {
        Self {
            ctx,
            editing: Some(address.id),
            kind: match address.kind {
                AddressKind::Shipping => "shipping",
                AddressKind::Billing => "billing",
            }
            .to_string(),
            full_name: address.full_name.clone(),
            line1: address.line1.clone(),
            line2: address.line2.clone().unwrap_or_default(),
            city: address.city.clone(),
            state: address.state.clone(),
            postal_code: address.postal_code.to_string(),
            phone: address.phone.to_string(),
            is_default: address.is_default,
        }
    }
}

/// Display the address book, grouped by kind.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    api: ApiContext,
) -> Result<AddressIndexTemplate> {
    let addresses = api.client().addresses().list().await?;
    api.persist().await?;

    Ok(AddressIndexTemplate::build(&state, &session, user, addresses).await)
}

/// Display the new-address form.
#[instrument(skip_all)]
pub async fn new_form(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<AddressFormTemplate> {
    Ok(AddressFormTemplate::blank(
        PageContext::build(&state, &session, Some(user)).await,
    ))
}

/// Create a new address.
#[instrument(skip_all)]
pub async fn create(
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
    Form(form): Form<AddressForm>,
) -> Result<Redirect> {
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(message) => {
            flash_error(&session, message).await?;
            return Ok(Redirect::to("/account/addresses/new"));
        }
    };

    api.client().addresses().create(&payload).await?;
    api.persist().await?;

    flash_success(&session, "Address saved").await?;
    Ok(Redirect::to("/account/addresses"))
}

/// Display the edit form for an address.
#[instrument(skip(state, session, user, api))]
pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    api: ApiContext,
    Path(id): Path<i64>,
) -> Result<Response> {
    let id = AddressId::new(id);
    let addresses = api.client().addresses().list().await?;
    api.persist().await?;

    let Some(address) = addresses.iter().find(|address| address.id == id) else {
        flash_error(&session, "That address no longer exists").await?;
        return Ok(Redirect::to("/account/addresses").into_response());
    };

    Ok(AddressFormTemplate::for_address(
        PageContext::build(&state, &session, Some(user)).await,
        address,
    )
    .into_response())
}

/// Update an existing address.
#[instrument(skip(session, api, form))]
pub async fn update(
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
    Path(id): Path<i64>,
    Form(form): Form<AddressForm>,
) -> Result<Redirect> {
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(message) => {
            flash_error(&session, message).await?;
            return Ok(Redirect::to(&format!("/account/addresses/{id}/edit")));
        }
    };

    api.client()
        .addresses()
        .update(AddressId::new(id), &payload)
        .await?;
    api.persist().await?;

    flash_success(&session, "Address updated").await?;
    Ok(Redirect::to("/account/addresses"))
}

/// Delete an address.
#[instrument(skip(session, api))]
pub async fn delete(
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    api.client().addresses().delete(AddressId::new(id)).await?;
    api.persist().await?;

    flash_success(&session, "Address deleted").await?;
    Ok(Redirect::to("/account/addresses"))
}

/// Make an address the default within its kind.
///
/// The backend flips the flag only among addresses of the same kind and
/// returns the refreshed list, which is rendered directly.
#[instrument(skip(state, session, user, api))]
pub async fn set_default(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    api: ApiContext,
    Path(id): Path<i64>,
) -> Result<AddressIndexTemplate> {
    let addresses = api
        .client()
        .addresses()
        .set_default(AddressId::new(id))
        .await?;
    api.persist().await?;

    flash_success(&session, "Default address updated").await?;
    Ok(AddressIndexTemplate::build(&state, &session, user, addresses).await)
}
