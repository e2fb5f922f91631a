//! Cart operations.
//!
//! Every mutation round-trips to the backend and returns the updated
//! cart; there is no local cart state to reconcile.

use reqwest::Method;
use tracing::instrument;

use meridian_core::{Cart, CartItemId, ProductId};

use crate::client::Client;
use crate::endpoints;
use crate::error::ApiError;

/// Cart operations for the authenticated customer.
pub struct CartService<'a> {
    client: &'a Client,
}

impl<'a> CartService<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the request fails.
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<Cart, ApiError> {
        self.client
            .request_json(Method::GET, endpoints::CART, None, None)
            .await
    }

    /// Add a product to the cart.
    ///
    /// The caller is responsible for clamping `quantity` to the stated
    /// stock first (see `meridian_core::clamp_quantity`); the backend
    /// re-validates and rejects out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is unknown or the quantity is
    /// rejected.
    #[instrument(skip(self))]
    pub async fn add_item(&self, product_id: ProductId, quantity: u32) -> Result<Cart, ApiError> {
        let body = serde_json::json!({
            "product_id": product_id,
            "quantity": quantity,
        });
        self.client
            .request_json(Method::POST, endpoints::CART_ITEMS, None, Some(&body))
            .await
    }

    /// Change the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is unknown or the quantity is
    /// rejected.
    #[instrument(skip(self))]
    pub async fn update_item(&self, id: CartItemId, quantity: u32) -> Result<Cart, ApiError> {
        let body = serde_json::json!({ "quantity": quantity });
        self.client
            .request_json(Method::PATCH, &endpoints::cart_item(id), None, Some(&body))
            .await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is unknown.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, id: CartItemId) -> Result<Cart, ApiError> {
        self.client
            .request_json(Method::DELETE, &endpoints::cart_item(id), None, None)
            .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), ApiError> {
        self.client
            .request_empty(Method::DELETE, endpoints::CART, None)
            .await
    }
}
