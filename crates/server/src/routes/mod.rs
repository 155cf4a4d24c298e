//! HTTP route handlers for the Gala API.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog (public)
//! GET  /produits                    - In-stock products
//! GET  /produits/featured           - Featured products
//! GET  /produits/category/{cat}     - Products by category
//! GET  /produits/{slug}             - Product detail
//! GET  /services[...]               - Same shape for services
//! GET  /portfolio[...]              - Same shape for portfolio (detail by id)
//!
//! # Orders (public)
//! POST /commandes                   - Place an order
//! GET  /commandes/{id}              - Track an order
//!
//! # Contact (public)
//! POST /contact                     - Leave a message
//!
//! # Auth
//! GET  /auth/csrf-cookie            - Anti-forgery handshake
//! POST /login                       - Credential exchange (handshake required)
//! POST /logout                      - Revoke the bearer token (auth)
//! GET  /user                        - Current identity (auth)
//!
//! # Admin (bearer token required; role noted where stricter)
//! GET  /admin/dashboard             - Aggregate counts
//! GET  /admin/recent-orders         - Latest orders
//! GET  /admin/recent-contacts       - Latest contact messages (admin)
//! GET  /admin/contacts              - All contact messages (admin)
//! GET  /admin/commandes             - All orders
//! GET/PUT/DELETE /admin/commandes/{id} - Order detail / status / delete (delete: admin)
//! GET/POST /admin/produits          - Product list / create
//! PUT/DELETE /admin/produits/{id}   - Product update / delete
//! ```

pub mod admin;
pub mod auth;
pub mod contact;
pub mod orders;
pub mod portfolio;
pub mod products;
pub mod services;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/produits", products::router())
        .nest("/services", services::router())
        .nest("/portfolio", portfolio::router())
        .route("/commandes", post(orders::create))
        .route("/commandes/{id}", get(orders::show))
        .route("/contact", post(contact::create))
        .merge(auth::router())
        .nest("/admin", admin::router())
}
