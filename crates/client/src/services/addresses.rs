//! Address book operations.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use meridian_core::{Address, AddressId, AddressKind, Phone, PostalCode};

use crate::client::Client;
use crate::endpoints;
use crate::error::ApiError;

/// Payload for creating or updating an address.
///
/// `postal_code` and `phone` are validated types; malformed input is
/// rejected before a request is ever built.
#[derive(Debug, Clone, Serialize)]
pub struct AddressPayload {
    pub kind: AddressKind,
    pub full_name: String,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: PostalCode,
    pub phone: Phone,
    pub is_default: bool,
}

/// Address book operations for the authenticated customer.
pub struct AddressService<'a> {
    client: &'a Client,
}

impl<'a> AddressService<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List all saved addresses, both kinds.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Address>, ApiError> {
        self.client
            .request_json(Method::GET, endpoints::ADDRESSES, None, None)
            .await
    }

    /// Save a new address.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails backend validation.
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &AddressPayload) -> Result<Address, ApiError> {
        let body = serde_json::to_value(payload)?;
        self.client
            .request_json(Method::POST, endpoints::ADDRESSES, None, Some(&body))
            .await
    }

    /// Update an existing address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is unknown or the payload fails
    /// backend validation.
    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: AddressId, payload: &AddressPayload) -> Result<Address, ApiError> {
        let body = serde_json::to_value(payload)?;
        self.client
            .request_json(Method::PATCH, &endpoints::address(id), None, Some(&body))
            .await
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is unknown.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: AddressId) -> Result<(), ApiError> {
        self.client
            .request_empty(Method::DELETE, &endpoints::address(id), None)
            .await
    }

    /// Make an address the default within its kind.
    ///
    /// The backend clears the flag on the previous default of the same
    /// kind only; the other kind's default is untouched. Returns the
    /// full refreshed list.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is unknown.
    #[instrument(skip(self))]
    pub async fn set_default(&self, id: AddressId) -> Result<Vec<Address>, ApiError> {
        self.client
            .request_json(Method::POST, &endpoints::address_default(id), None, None)
            .await
    }
}
