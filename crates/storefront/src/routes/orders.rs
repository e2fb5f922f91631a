//! Order history and tracking.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use meridian_core::{Order, OrderId};

use crate::error::Result;
use crate::filters;
use crate::middleware::{ApiContext, RequireAuth};
use crate::models::{CheckoutState, flash_error, flash_success, session_keys};
use crate::routes::PageContext;
use crate::state::AppState;

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrderIndexTemplate {
    pub ctx: PageContext,
    pub orders: Vec<Order>,
}

/// Order detail template with the status timeline.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub ctx: PageContext,
    pub order: Order,
}

/// Display the order history, newest first.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    api: ApiContext,
) -> Result<OrderIndexTemplate> {
    let orders = api.client().orders().list().await?;
    api.persist().await?;

    Ok(OrderIndexTemplate {
        ctx: PageContext::build(&state, &session, Some(user)).await,
        orders,
    })
}

/// Display one order with its status history and payment record.
#[instrument(skip(state, session, user, api))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    api: ApiContext,
    Path(id): Path<i64>,
) -> Result<OrderShowTemplate> {
    let order = api.client().orders().get(OrderId::new(id)).await?;
    api.persist().await?;

    Ok(OrderShowTemplate {
        ctx: PageContext::build(&state, &session, Some(user)).await,
        order,
    })
}

/// Request cancellation of an order.
///
/// The shipment cutoff is checked locally first for a friendlier
/// message; the backend enforces it regardless.
#[instrument(skip(session, api))]
pub async fn cancel(
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    let order_id = OrderId::new(id);
    let order = api.client().orders().get(order_id).await?;

    if !order.can_cancel() {
        flash_error(
            &session,
            format!("Order {} has already shipped and can no longer be cancelled", order.number),
        )
        .await?;
        return Ok(Redirect::to(&format!("/orders/{id}")));
    }

    let order = api.client().orders().cancel(order_id).await?;
    api.persist().await?;

    flash_success(&session, format!("Order {} has been cancelled", order.number)).await?;
    Ok(Redirect::to(&format!("/orders/{id}")))
}

/// Re-enter the payment step for an order that is still awaiting payment.
#[instrument(skip(session, api))]
pub async fn pay(
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    let order_id = OrderId::new(id);
    let order = api.client().orders().get(order_id).await?;
    api.persist().await?;

    if !order.awaiting_payment() {
        flash_error(&session, format!("Order {} is not awaiting payment", order.number)).await?;
        return Ok(Redirect::to(&format!("/orders/{id}")));
    }

    // Rebuild the wizard state from the order so the payment step's
    // prerequisites hold.
    let checkout = CheckoutState {
        shipping_address_id: Some(order.shipping_address.id),
        billing_address_id: Some(order.billing_address.id),
        bill_to_shipping: false,
        pending_order_id: Some(order_id),
    };
    session.insert(session_keys::CHECKOUT, &checkout).await?;

    Ok(Redirect::to("/checkout?step=payment"))
}
