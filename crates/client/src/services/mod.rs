//! Per-resource service wrappers.
//!
//! Each service borrows the [`Client`](crate::Client) and groups the
//! operations for one backend resource. Request payload types live next
//! to the service that sends them; response records come from
//! `meridian-core`.

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod payments;

pub use addresses::{AddressPayload, AddressService};
pub use auth::{AuthService, AuthSession, ProfileUpdate, RegisterPayload};
pub use cart::CartService;
pub use catalog::{CatalogService, ProductFilter, ProductPage};
pub use orders::{OrderService, PlaceOrderPayload};
pub use payments::{CheckoutSession, PaymentConfirmation, PaymentService};
