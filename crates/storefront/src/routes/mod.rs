//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                             - Home page (public)
//! GET  /health                       - Liveness check
//!
//! # Auth
//! GET  /login                        - Login page
//! POST /login                        - Store the credential issued by the backend
//! POST /logout                       - Clear the credential
//!
//! # Customer (customer only)
//! GET  /cart                         - Cart
//! GET  /orders                       - Order history
//!
//! # Dashboards
//! GET  /store-admin                  - Inventory and discounts (store admin only)
//! GET  /super-admin                  - Stores, users, revenue (super admin only)
//! GET  /account                      - Account overview (any signed-in role)
//!
//! # Not authorized views
//! GET  /not-authorized-customer
//! GET  /not-authorized-store-admin
//! GET  /not-authorized-super-admin
//!
//! # API
//! GET  /api/stores/nearby            - Stores sorted by distance (JSON)
//! ```

pub mod account;
pub mod auth;
pub mod dashboard;
pub mod home;
pub mod not_authorized;
pub mod stores;

use axum::{
    Router,
    extract::Request,
    middleware::from_fn,
    routing::{get, post},
};
use lapak_core::Role;
use tower_http::trace::TraceLayer;

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Landing page for each role after sign-in.
#[must_use]
pub const fn home_path(role: Role) -> &'static str {
    match role {
        Role::Customer => "/",
        Role::StoreAdmin => "/store-admin",
        Role::SuperAdmin => "/super-admin",
    }
}

/// Build the full application router with its middleware stack.
pub fn router(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/", get(home::index))
        .route("/health", get(health))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/cart", get(account::cart))
        .route("/orders", get(account::orders))
        .route("/account", get(account::overview))
        .route("/store-admin", get(dashboard::store_admin))
        .route("/super-admin", get(dashboard::super_admin))
        .route("/not-authorized-customer", get(not_authorized::customer))
        .route("/not-authorized-store-admin", get(not_authorized::store_admin))
        .route("/not-authorized-super-admin", get(not_authorized::super_admin))
        .route("/api/stores/nearby", get(stores::nearby))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
