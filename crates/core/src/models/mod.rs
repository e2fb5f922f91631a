//! Entity records mirrored from the backend API.
//!
//! These are plain wire-format records: the backend owns their
//! invariants, and every mutation round-trips before state updates.
//! Records are fetched on demand and discarded after the response.

pub mod address;
pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use address::{Address, AddressKind, promote_default};
pub use cart::{Cart, CartItem, CartTotals, clamp_quantity};
pub use order::{Order, OrderItem, OrderStatusEvent, PaymentRecord};
pub use product::{Category, Product, ProductImage};
pub use user::User;
