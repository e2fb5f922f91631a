//! Payment gateway handoff operations.
//!
//! The backend owns the Razorpay server credentials for order creation;
//! the storefront only opens the hosted widget and reports the signed
//! result back for verification.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use meridian_core::{CurrencyCode, Order, OrderId};

use crate::client::Client;
use crate::endpoints;
use crate::error::ApiError;

/// A Razorpay checkout session created by the backend for an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Our order this session pays for.
    pub order_id: OrderId,
    /// Razorpay's order id (`order_...`), passed to the widget.
    pub razorpay_order_id: String,
    /// Publishable key id for the widget.
    pub razorpay_key_id: String,
    /// Amount in the currency's minor unit (paise).
    pub amount: i64,
    pub currency: CurrencyCode,
}

/// The signed result posted back by the widget redirect.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentConfirmation {
    pub order_id: OrderId,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Payment operations for the authenticated customer.
pub struct PaymentService<'a> {
    client: &'a Client,
}

impl<'a> PaymentService<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Ask the backend to create a Razorpay order for checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is unknown or already paid.
    #[instrument(skip(self))]
    pub async fn create_checkout(&self, order_id: OrderId) -> Result<CheckoutSession, ApiError> {
        let body = serde_json::json!({ "order_id": order_id });
        self.client
            .request_json(
                Method::POST,
                endpoints::PAYMENTS_RAZORPAY_ORDER,
                None,
                Some(&body),
            )
            .await
    }

    /// Report a signed payment result for server-side verification.
    ///
    /// Returns the order with its payment status updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature is rejected or the payment was
    /// not captured.
    #[instrument(skip(self, confirmation), fields(order_id = %confirmation.order_id))]
    pub async fn confirm(&self, confirmation: &PaymentConfirmation) -> Result<Order, ApiError> {
        let body = serde_json::to_value(confirmation)?;
        self.client
            .request_json(
                Method::POST,
                endpoints::PAYMENTS_RAZORPAY_VERIFY,
                None,
                Some(&body),
            )
            .await
    }
}
