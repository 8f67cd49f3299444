//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//!
//! # Products
//! GET  /products/{id}               - Product page (loading indicator)
//! GET  /products/{id}/details       - Product details fragment (HTMX)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                        - Cart drawer
//! POST /cart/add/{id}               - Add to cart (returns drawer, triggers cart-updated)
//! POST /cart/remove/{product_id}    - Remove from cart (returns drawer, triggers cart-updated)
//! POST /cart/close                  - Close drawer
//! GET  /cart/count                  - Cart signal badge
//! GET  /cart/checkout               - Redirect to checkout page
//!
//! # Auth
//! POST /auth/token                  - Store backend bearer token
//! POST /auth/logout                 - Drop backend bearer token
//! ```

pub mod auth;
pub mod cart;
pub mod products;

use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(products::show))
        .route("/{id}/details", get(products::details))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{id}", post(cart::add))
        .route("/remove/{product_id}", post(cart::remove))
        .route("/close", post(cart::close))
        .route("/count", get(cart::count))
        .route("/checkout", get(cart::checkout))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/token", post(auth::store_token))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
pub async fn health() -> &'static str {
    "ok"
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
