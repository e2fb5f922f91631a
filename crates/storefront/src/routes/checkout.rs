//! Checkout wizard route handlers.
//!
//! Four steps: shipping address → billing address → review → payment.
//! Selections live in the session between steps; the order is created at
//! the review step and paid through the Razorpay hosted widget on the
//! payment step. Deep links to steps whose prerequisites are missing
//! clamp back to the furthest permitted step.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};

use meridian_client::services::{CheckoutSession, PaymentConfirmation, PlaceOrderPayload};
use meridian_core::{Address, AddressId, AddressKind, Cart, Order, OrderId, User};

use crate::error::{AppError, Result};
use crate::filters;
use crate::services::razorpay::SignatureError;
use crate::middleware::{ApiContext, CspNonce, RequireAuth};
use crate::models::{CheckoutState, CheckoutStep, flash_error, flash_success, session_keys};
use crate::routes::PageContext;
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

async fn load_state(session: &Session) -> CheckoutState {
    session
        .get::<CheckoutState>(session_keys::CHECKOUT)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

async fn save_state(
    session: &Session,
    state: &CheckoutState,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CHECKOUT, state).await
}

async fn clear_state(
    session: &Session,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session
        .remove::<CheckoutState>(session_keys::CHECKOUT)
        .await?;
    Ok(())
}

// =============================================================================
// Forms
// =============================================================================

/// Wizard step query parameter.
#[derive(Debug, Deserialize)]
pub struct StepQuery {
    pub step: Option<String>,
}

/// Shipping address selection.
#[derive(Debug, Deserialize)]
pub struct ShippingForm {
    pub address_id: i64,
}

/// Billing address selection: either a saved billing address or the
/// bill-to-shipping shortcut (checkbox).
#[derive(Debug, Deserialize)]
pub struct BillingForm {
    pub address_id: Option<i64>,
    pub bill_to_shipping: Option<String>,
}

/// Signed result posted back by the widget handler.
#[derive(Debug, Deserialize)]
pub struct CallbackForm {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

/// Confirmation page query parameter.
#[derive(Debug, Deserialize)]
pub struct CompleteQuery {
    pub order: i64,
}

// =============================================================================
// Templates
// =============================================================================

/// Shipping / billing address selection template (steps 1 and 2).
#[derive(Template, WebTemplate)]
#[template(path = "checkout/addresses.html")]
pub struct CheckoutAddressesTemplate {
    pub ctx: PageContext,
    pub step: CheckoutStep,
    pub addresses: Vec<Address>,
    /// Selected address id, or -1 when nothing is selected yet.
    pub selected_id: i64,
    pub bill_to_shipping: bool,
}

/// Review template (step 3).
#[derive(Template, WebTemplate)]
#[template(path = "checkout/review.html")]
pub struct CheckoutReviewTemplate {
    pub ctx: PageContext,
    pub step: CheckoutStep,
    pub cart: Cart,
    pub shipping: Address,
    pub billing: Address,
}

/// Payment template (step 4), embedding the widget options.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/payment.html")]
pub struct CheckoutPaymentTemplate {
    pub ctx: PageContext,
    pub step: CheckoutStep,
    pub order: Order,
    pub options_json: String,
    pub nonce: String,
}

/// Confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/complete.html")]
pub struct CheckoutCompleteTemplate {
    pub ctx: PageContext,
    pub order: Order,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the wizard at the requested step, clamped to the furthest
/// step whose prerequisites are met.
#[instrument(skip(state, session, user, api, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    api: ApiContext,
    CspNonce(nonce): CspNonce,
    Query(query): Query<StepQuery>,
) -> Result<Response> {
    let checkout = load_state(&session).await;

    let requested = query
        .step
        .as_deref()
        .and_then(CheckoutStep::from_slug)
        .unwrap_or_else(|| checkout.furthest_step());
    let step = checkout.clamp_step(requested);

    let response = match step {
        CheckoutStep::ShippingAddress | CheckoutStep::BillingAddress => {
            address_step(&state, &session, user, &api, &checkout, step).await?
        }
        CheckoutStep::Review => review_step(&state, &session, user, &api, &checkout).await?,
        CheckoutStep::Payment => {
            payment_step(&state, &session, user, &api, &checkout, nonce).await?
        }
    };

    api.persist().await?;
    Ok(response)
}

async fn address_step(
    state: &AppState,
    session: &Session,
    user: User,
    api: &ApiContext,
    checkout: &CheckoutState,
    step: CheckoutStep,
) -> Result<Response> {
    let kind = if step == CheckoutStep::ShippingAddress {
        AddressKind::Shipping
    } else {
        AddressKind::Billing
    };

    let addresses: Vec<Address> = api
        .client()
        .addresses()
        .list()
        .await?
        .into_iter()
        .filter(|address| address.kind == kind)
        .collect();

    let selected = if kind == AddressKind::Shipping {
        checkout.shipping_address_id
    } else {
        checkout.billing_address_id
    };

    Ok(CheckoutAddressesTemplate {
        ctx: PageContext::build(state, session, Some(user)).await,
        step,
        addresses,
        selected_id: selected.map_or(-1, |id| id.as_i64()),
        bill_to_shipping: checkout.bill_to_shipping,
    }
    .into_response())
}

async fn review_step(
    state: &AppState,
    session: &Session,
    user: User,
    api: &ApiContext,
    checkout: &CheckoutState,
) -> Result<Response> {
    let client = api.client();
    let cart_svc = client.cart();
    let addresses_svc = client.addresses();
    let (cart, addresses) = tokio::join!(cart_svc.get(), addresses_svc.list());
    let cart = cart?;
    let addresses = addresses?;

    if cart.is_empty() {
        flash_error(session, "Your cart is empty").await?;
        return Ok(Redirect::to("/cart").into_response());
    }

    let find = |id: Option<AddressId>| {
        id.and_then(|id| addresses.iter().find(|address| address.id == id).cloned())
    };

    let (Some(shipping), Some(billing)) = (
        find(checkout.shipping_address_id),
        find(checkout.resolved_billing_address_id()),
    ) else {
        // A selected address was deleted in the meantime; start over.
        flash_error(session, "Please pick your addresses again").await?;
        return Ok(Redirect::to("/checkout?step=shipping").into_response());
    };

    Ok(CheckoutReviewTemplate {
        ctx: PageContext::build(state, session, Some(user)).await,
        step: CheckoutStep::Review,
        cart,
        shipping,
        billing,
    }
    .into_response())
}

async fn payment_step(
    state: &AppState,
    session: &Session,
    user: User,
    api: &ApiContext,
    checkout: &CheckoutState,
    nonce: String,
) -> Result<Response> {
    let Some(order_id) = checkout.pending_order_id else {
        return Ok(Redirect::to("/checkout").into_response());
    };

    let order = api.client().orders().get(order_id).await?;

    if !order.awaiting_payment() {
        // Paid (or cancelled) elsewhere; nothing left to collect.
        clear_state(session).await?;
        return Ok(Redirect::to(&format!("/orders/{order_id}")).into_response());
    }

    let checkout_session: CheckoutSession =
        api.client().payments().create_checkout(order_id).await?;

    let options =
        state
            .razorpay()
            .checkout_options(&checkout_session, &user, &state.config().app_name);
    // The options land inside an inline <script>; escape `<` so profile
    // data can never close the tag.
    let options_json = serde_json::to_string(&options)
        .map_err(|e| AppError::Internal(format!("checkout options serialization: {e}")))?
        .replace('<', "\\u003c");

    Ok(CheckoutPaymentTemplate {
        ctx: PageContext::build(state, session, Some(user)).await,
        step: CheckoutStep::Payment,
        order,
        options_json,
        nonce,
    }
    .into_response())
}

/// Select the shipping address and advance to billing.
#[instrument(skip(session, api))]
pub async fn select_shipping(
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
    Form(form): Form<ShippingForm>,
) -> Result<Redirect> {
    let id = AddressId::new(form.address_id);
    let addresses = api.client().addresses().list().await?;
    api.persist().await?;

    let valid = addresses
        .iter()
        .any(|address| address.id == id && address.kind == AddressKind::Shipping);
    if !valid {
        flash_error(&session, "Please choose one of your shipping addresses").await?;
        return Ok(Redirect::to("/checkout?step=shipping"));
    }

    let mut checkout = load_state(&session).await;
    checkout.shipping_address_id = Some(id);
    // A new order will be placed against the new address.
    checkout.pending_order_id = None;
    save_state(&session, &checkout).await?;

    Ok(Redirect::to("/checkout?step=billing"))
}

/// Select the billing address (or bill-to-shipping) and advance to review.
#[instrument(skip(session, api))]
pub async fn select_billing(
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
    Form(form): Form<BillingForm>,
) -> Result<Redirect> {
    let mut checkout = load_state(&session).await;

    if checkout.shipping_address_id.is_none() {
        return Ok(Redirect::to("/checkout?step=shipping"));
    }

    if form.bill_to_shipping.is_some() {
        checkout.bill_to_shipping = true;
        checkout.billing_address_id = None;
    } else if let Some(raw_id) = form.address_id {
        let id = AddressId::new(raw_id);
        let addresses = api.client().addresses().list().await?;
        api.persist().await?;

        let valid = addresses
            .iter()
            .any(|address| address.id == id && address.kind == AddressKind::Billing);
        if !valid {
            flash_error(&session, "Please choose one of your billing addresses").await?;
            return Ok(Redirect::to("/checkout?step=billing"));
        }
        checkout.bill_to_shipping = false;
        checkout.billing_address_id = Some(id);
    } else {
        flash_error(&session, "Pick a billing address or bill to your shipping address").await?;
        return Ok(Redirect::to("/checkout?step=billing"));
    }

    checkout.pending_order_id = None;
    save_state(&session, &checkout).await?;

    Ok(Redirect::to("/checkout?step=review"))
}

/// Place the order from the reviewed cart and move to payment.
#[instrument(skip_all)]
pub async fn place_order(
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
) -> Result<Redirect> {
    let mut checkout = load_state(&session).await;

    let (Some(shipping), Some(billing)) = (
        checkout.shipping_address_id,
        checkout.resolved_billing_address_id(),
    ) else {
        return Ok(Redirect::to("/checkout"));
    };

    let cart = api.client().cart().get().await?;
    if cart.is_empty() {
        flash_error(&session, "Your cart is empty").await?;
        return Ok(Redirect::to("/cart"));
    }

    let order = api
        .client()
        .orders()
        .place(&PlaceOrderPayload {
            shipping_address_id: shipping,
            billing_address_id: billing,
            payment_method: "razorpay".to_string(),
        })
        .await?;
    api.persist().await?;

    checkout.pending_order_id = Some(order.id);
    save_state(&session, &checkout).await?;

    Ok(Redirect::to("/checkout?step=payment"))
}

/// Receive the signed widget result, verify it, and confirm with the
/// backend.
#[instrument(skip_all, fields(razorpay_order_id = %form.razorpay_order_id))]
pub async fn payment_callback(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_user): RequireAuth,
    api: ApiContext,
    Form(form): Form<CallbackForm>,
) -> Result<Redirect> {
    let checkout = load_state(&session).await;
    let Some(order_id) = checkout.pending_order_id else {
        return Err(AppError::BadRequest("no payment in progress".to_string()));
    };

    // Verify the signature locally before involving the backend. A
    // malformed signature never comes out of the real widget; reject it
    // outright. A well-formed mismatch gets a retry.
    if let Err(e) = state.razorpay().verify_signature(
        &form.razorpay_order_id,
        &form.razorpay_payment_id,
        &form.razorpay_signature,
    ) {
        warn!(error = %e, "rejected razorpay callback");
        if matches!(e, SignatureError::Malformed) {
            return Err(AppError::Payment(e));
        }
        flash_error(
            &session,
            "We could not verify that payment. Please try again.",
        )
        .await?;
        return Ok(Redirect::to("/checkout?step=payment"));
    }

    let confirmation = PaymentConfirmation {
        order_id,
        razorpay_order_id: form.razorpay_order_id,
        razorpay_payment_id: form.razorpay_payment_id,
        razorpay_signature: form.razorpay_signature,
    };

    match api.client().payments().confirm(&confirmation).await {
        Ok(order) => {
            api.persist().await?;
            clear_state(&session).await?;
            flash_success(&session, "Payment received. Thank you for your order!").await?;
            Ok(Redirect::to(&format!("/checkout/complete?order={}", order.id)))
        }
        Err(e) => {
            api.persist().await?;
            warn!(error = %e, "backend rejected payment confirmation");
            flash_error(
                &session,
                "Payment verification failed. If you were charged, the amount will be refunded.",
            )
            .await?;
            Ok(Redirect::to("/checkout?step=payment"))
        }
    }
}

/// Order confirmation page.
#[instrument(skip(state, session, user, api))]
pub async fn complete(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    api: ApiContext,
    Query(query): Query<CompleteQuery>,
) -> Result<CheckoutCompleteTemplate> {
    let order = api.client().orders().get(OrderId::new(query.order)).await?;
    api.persist().await?;

    Ok(CheckoutCompleteTemplate {
        ctx: PageContext::build(&state, &session, Some(user)).await,
        order,
    })
}
