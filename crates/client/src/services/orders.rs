//! Order placement and tracking.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use meridian_core::{AddressId, Order, OrderId};

use crate::client::Client;
use crate::endpoints;
use crate::error::ApiError;

/// Payload for `POST /orders`. The backend snapshots the cart and the
/// two addresses into the immutable order record.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceOrderPayload {
    pub shipping_address_id: AddressId,
    pub billing_address_id: AddressId,
    /// Gateway identifier, currently always `razorpay`.
    pub payment_method: String,
}

/// Order operations for the authenticated customer.
pub struct OrderService<'a> {
    client: &'a Client,
}

impl<'a> OrderService<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List the customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, ApiError> {
        self.client
            .request_json(Method::GET, endpoints::ORDERS, None, None)
            .await
    }

    /// Fetch a single order with its status history.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the order does not exist or
    /// belongs to another customer.
    #[instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Order, ApiError> {
        self.client
            .request_json(Method::GET, &endpoints::order(id), None, None)
            .await
    }

    /// Place an order from the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty or an address is invalid.
    #[instrument(skip(self, payload))]
    pub async fn place(&self, payload: &PlaceOrderPayload) -> Result<Order, ApiError> {
        let body = serde_json::to_value(payload)?;
        self.client
            .request_json(Method::POST, endpoints::ORDERS, None, Some(&body))
            .await
    }

    /// Request cancellation of an order.
    ///
    /// The backend rejects this once the order has shipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be cancelled.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<Order, ApiError> {
        self.client
            .request_json(Method::POST, &endpoints::order_cancel(id), None, None)
            .await
    }
}
