//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing (search/category/page params)
//! GET  /products/{slug}        - Product detail
//!
//! # Cart (requires auth)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart
//! POST /cart/update            - Update quantity
//! POST /cart/remove            - Remove item
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout (requires auth)
//! GET  /checkout               - Wizard (step=shipping|billing|review|payment)
//! POST /checkout/shipping      - Select shipping address
//! POST /checkout/billing       - Select billing address
//! POST /checkout/place         - Place the order, move to payment
//! POST /checkout/payment/callback - Signed Razorpay result
//! GET  /checkout/complete      - Confirmation page
//!
//! # Orders (requires auth)
//! GET  /orders                 - Order history
//! GET  /orders/{id}            - Order detail with status timeline
//! POST /orders/{id}/cancel     - Request cancellation
//! POST /orders/{id}/pay        - Re-enter payment for an unpaid order
//!
//! # Account (requires auth)
//! GET  /account                - Profile and recent orders
//! POST /account/profile        - Update profile
//! GET  /account/addresses      - Address book
//! GET  /account/addresses/new  - New address form
//! POST /account/addresses      - Create address
//! GET  /account/addresses/{id}/edit - Edit address form
//! POST /account/addresses/{id}      - Update address
//! POST /account/addresses/{id}/delete  - Delete address
//! POST /account/addresses/{id}/default - Make default within its kind
//!
//! # Auth (rate limited)
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//! ```

pub mod account;
pub mod addresses;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use meridian_core::User;

use crate::models::{Flash, take_flash};
use crate::state::AppState;

/// Fields every page template needs: shop name, the signed-in user (for
/// the header), and the pending flash notice.
pub struct PageContext {
    pub app_name: String,
    pub user: Option<User>,
    pub flash: Option<Flash>,
}

impl PageContext {
    /// Build the context, consuming the pending flash notice.
    pub async fn build(state: &AppState, session: &Session, user: Option<User>) -> Self {
        Self {
            app_name: state.config().app_name.clone(),
            user,
            flash: take_flash(session).await,
        }
    }
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/shipping", post(checkout::select_shipping))
        .route("/billing", post(checkout::select_billing))
        .route("/place", post(checkout::place_order))
        .route("/payment/callback", post(checkout::payment_callback))
        .route("/complete", get(checkout::complete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/cancel", post(orders::cancel))
        .route("/{id}/pay", post(orders::pay))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::show))
        .route("/profile", post(account::update_profile))
        .route("/addresses", get(addresses::index).post(addresses::create))
        .route("/addresses/new", get(addresses::new_form))
        .route("/addresses/{id}/edit", get(addresses::edit_form))
        .route("/addresses/{id}", post(addresses::update))
        .route("/addresses/{id}/delete", post(addresses::delete))
        .route("/addresses/{id}/default", post(addresses::set_default))
}
