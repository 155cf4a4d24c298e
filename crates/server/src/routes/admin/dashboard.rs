//! Admin dashboard aggregates.

use axum::{Json, extract::State};
use serde::Serialize;

use gala_core::OrderStatus;

use crate::db::contacts::ContactRepository;
use crate::db::orders::OrderRepository;
use crate::db::portfolio::PortfolioRepository;
use crate::db::products::ProductRepository;
use crate::db::services::ServiceRepository;
use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{ContactMessage, OrderWithItems};
use crate::response::ApiResponse;
use crate::state::AppState;

/// How many rows the "recent" dashboard widgets show.
const RECENT_LIMIT: i64 = 10;

/// Dashboard statistics. Field names match what the admin frontend
/// renders.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_services: i64,
    pub total_produits: i64,
    pub total_commandes: i64,
    pub commandes_en_attente: i64,
    pub total_contacts: i64,
    pub total_portfolio: i64,
}

/// Aggregate counts for the dashboard landing page.
pub async fn stats(
    RequireAuth(_admin): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>> {
    let pool = state.pool();
    let orders = OrderRepository::new(pool);

    let stats = DashboardStats {
        total_services: ServiceRepository::new(pool).count().await?,
        total_produits: ProductRepository::new(pool).count().await?,
        total_commandes: orders.count().await?,
        commandes_en_attente: orders.count_with_status(OrderStatus::Pending).await?,
        total_contacts: ContactRepository::new(pool).count().await?,
        total_portfolio: PortfolioRepository::new(pool).count().await?,
    };

    Ok(Json(ApiResponse::ok(stats)))
}

/// Latest orders with their line items.
pub async fn recent_orders(
    RequireAuth(_admin): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<OrderWithItems>>>> {
    let commandes = OrderRepository::new(state.pool())
        .list_recent(RECENT_LIMIT)
        .await?;
    Ok(Json(ApiResponse::ok(commandes)))
}

/// Latest contact messages. Raw contact data is restricted to role
/// `admin`.
pub async fn recent_contacts(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ContactMessage>>>> {
    let contacts = ContactRepository::new(state.pool())
        .list_recent(RECENT_LIMIT)
        .await?;
    Ok(Json(ApiResponse::ok(contacts)))
}
