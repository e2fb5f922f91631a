//! Meridian API client.
//!
//! A thin, typed wrapper over the commerce backend's REST API. All
//! requests flow through a single HTTP pipeline that adds bearer-token
//! headers, unwraps the `{ data, message }` response envelope, and
//! transparently refreshes an expired access token.
//!
//! # Token refresh
//!
//! A 401 response triggers exactly one refresh per expired token.
//! Concurrent requests that observe the same expired token queue on the
//! refresh gate; the first through performs the refresh, the rest detect
//! the rotated token via a generation counter and replay with it instead
//! of issuing duplicate refresh calls. A failed refresh clears the token
//! pair and surfaces [`ApiError::SessionExpired`], at which point the
//! caller is expected to drop its stored credentials and re-authenticate.
//!
//! # Example
//!
//! ```rust,ignore
//! use meridian_client::{Client, ClientConfig};
//!
//! let client = Client::new(ClientConfig::new("https://api.meridianshop.in/v1".parse()?));
//!
//! // Anonymous catalog browsing
//! let page = client.catalog().list_products(&Default::default()).await?;
//!
//! // Authenticated flows
//! client.auth().login("asha@example.com", "hunter2!secret").await?;
//! let cart = client.cart().get().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
pub mod endpoints;
mod error;
pub mod services;
mod token;

pub use client::{Client, ClientConfig};
pub use error::ApiError;
pub use token::AuthTokens;
