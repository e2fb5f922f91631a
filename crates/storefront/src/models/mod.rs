//! Session-held models for the storefront.
//!
//! The original browser app kept these in local storage and per-domain
//! client stores; here they live in the server session. Everything else
//! is fetched per request and discarded after render.

pub mod checkout;
pub mod session;

pub use checkout::{CheckoutState, CheckoutStep};
pub use session::{Flash, FlashKind, flash_error, flash_success, session_keys, take_flash};
