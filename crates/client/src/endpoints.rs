//! Backend endpoint paths.
//!
//! All paths are relative to the configured API base URL (e.g.
//! `https://api.meridianshop.in/v1`).

/// `POST` - create an account.
pub const AUTH_REGISTER: &str = "auth/register";
/// `POST` - exchange credentials for a token pair.
pub const AUTH_LOGIN: &str = "auth/login";
/// `POST` - invalidate the refresh token server-side.
pub const AUTH_LOGOUT: &str = "auth/logout";
/// `POST` - exchange a refresh token for a new token pair.
pub const AUTH_REFRESH: &str = "auth/refresh";
/// `GET`/`PATCH` - the authenticated user's profile.
pub const AUTH_ME: &str = "auth/me";

/// `GET` - product listing with `search`/`category`/`page` params.
pub const PRODUCTS: &str = "products";
/// `GET` - category listing.
pub const CATEGORIES: &str = "categories";

/// `GET`/`DELETE` - the authenticated user's cart.
pub const CART: &str = "cart";
/// `POST` - add a line to the cart.
pub const CART_ITEMS: &str = "cart/items";

/// `GET`/`POST` - order listing / placement.
pub const ORDERS: &str = "orders";

/// `GET`/`POST` - the authenticated user's addresses.
pub const ADDRESSES: &str = "users/addresses";

/// `POST` - create a Razorpay order for checkout.
pub const PAYMENTS_RAZORPAY_ORDER: &str = "payments/razorpay/order";
/// `POST` - verify a completed Razorpay payment.
pub const PAYMENTS_RAZORPAY_VERIFY: &str = "payments/razorpay/verify";

/// Path for a single product by slug.
#[must_use]
pub fn product(slug: &str) -> String {
    format!("{PRODUCTS}/{slug}")
}

/// Path for a single cart item.
#[must_use]
pub fn cart_item(id: meridian_core::CartItemId) -> String {
    format!("{CART_ITEMS}/{id}")
}

/// Path for a single order.
#[must_use]
pub fn order(id: meridian_core::OrderId) -> String {
    format!("{ORDERS}/{id}")
}

/// Path for cancelling an order.
#[must_use]
pub fn order_cancel(id: meridian_core::OrderId) -> String {
    format!("{ORDERS}/{id}/cancel")
}

/// Path for a single address.
#[must_use]
pub fn address(id: meridian_core::AddressId) -> String {
    format!("{ADDRESSES}/{id}")
}

/// Path for promoting an address to default within its kind.
#[must_use]
pub fn address_default(id: meridian_core::AddressId) -> String {
    format!("{ADDRESSES}/{id}/default")
}
