//! Cart route handlers.
//!
//! Every mutation round-trips to the backend and redirects back to the
//! cart page; quantities are clamped into `1..=stock` before anything
//! is sent.

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

use meridian_core::{Cart, CartItemId, ProductId, clamp_quantity};

use crate::error::Result;
use crate::filters;
use crate::middleware::{ApiContext, OptionalAuth, RequireAuth};
use crate::models::{flash_error, flash_success};
use crate::routes::PageContext;
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
    /// Slug of the product page the form was submitted from, used to
    /// look up stock and to redirect back on failure.
    pub slug: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: i64,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub ctx: PageContext,
    pub cart: Cart,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display the cart page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    api: ApiContext,
) -> Result<CartShowTemplate> {
    let cart = api.client().cart().get().await?;
    api.persist().await?;

    Ok(CartShowTemplate {
        ctx: PageContext::build(&state, &session, Some(user)).await,
        cart,
    })
}

/// Add a product to the cart.
///
/// Stock is checked against the catalog before the mutation is sent; an
/// out-of-stock product never produces a request.
#[instrument(skip(session, state, api))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product = state.catalog().product(&form.slug).await?;

    let Some(quantity) = clamp_quantity(form.quantity.unwrap_or(1), product.stock) else {
        flash_error(&session, format!("{} is out of stock", product.name)).await?;
        return Ok(Redirect::to(&format!("/products/{}", form.slug)));
    };

    api.client()
        .cart()
        .add_item(ProductId::new(form.product_id), quantity)
        .await?;
    api.persist().await?;

    flash_success(&session, format!("{} added to your cart", product.name)).await?;
    Ok(Redirect::to("/cart"))
}

/// Change the quantity of a cart line.
///
/// The requested quantity is clamped into `1..=stock` using the stock
/// the backend stated on the fetched cart.
#[instrument(skip(session, api))]
pub async fn update(
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect> {
    let item_id = CartItemId::new(form.item_id);
    let cart = api.client().cart().get().await?;

    let Some(item) = cart.items.iter().find(|item| item.id == item_id) else {
        flash_error(&session, "That item is no longer in your cart").await?;
        return Ok(Redirect::to("/cart"));
    };

    let Some(quantity) = clamp_quantity(form.quantity, item.stock) else {
        // Stock ran out between renders; drop the line instead.
        api.client().cart().remove_item(item_id).await?;
        api.persist().await?;
        flash_error(&session, format!("{} is out of stock and was removed", item.name)).await?;
        return Ok(Redirect::to("/cart"));
    };

    api.client().cart().update_item(item_id, quantity).await?;
    api.persist().await?;

    Ok(Redirect::to("/cart"))
}

/// Remove a line from the cart.
#[instrument(skip(session, api))]
pub async fn remove(
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    api.client()
        .cart()
        .remove_item(CartItemId::new(form.item_id))
        .await?;
    api.persist().await?;

    flash_success(&session, "Item removed from your cart").await?;
    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip_all)]
pub async fn clear(
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
) -> Result<Redirect> {
    api.client().cart().clear().await?;
    api.persist().await?;

    flash_success(&session, "Your cart is now empty").await?;
    Ok(Redirect::to("/cart"))
}

/// Cart count badge fragment for the header.
#[instrument(skip_all)]
pub async fn count(OptionalAuth(user): OptionalAuth, api: ApiContext) -> Result<CartCountTemplate> {
    let count = if user.is_some() {
        let cart = api.client().cart().get().await?;
        api.persist().await?;
        cart.item_count()
    } else {
        0
    };

    Ok(CartCountTemplate { count })
}
