//! Admin back-office routes.
//!
//! Everything here sits behind the authorization gate; handlers name
//! their minimum role through the extractor they take
//! ([`crate::middleware::RequireAuth`] or [`crate::middleware::RequireAdmin`]).

pub mod contacts;
pub mod dashboard;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::stats))
        .route("/recent-orders", get(dashboard::recent_orders))
        .route("/recent-contacts", get(dashboard::recent_contacts))
        .route("/contacts", get(contacts::index))
        .route("/commandes", get(orders::index))
        .route(
            "/commandes/{id}",
            get(orders::show).put(orders::update).delete(orders::destroy),
        )
        .route("/produits", get(products::index).post(products::create))
        .route(
            "/produits/{id}",
            put(products::update).delete(products::destroy),
        )
}
