//! Admin order management: listing, status changes, deletion.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use gala_core::{OrderId, OrderStatus};

use crate::error::{Result, ValidationErrors};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::OrderWithItems;
use crate::response::ApiResponse;
use crate::services::OrderService;
use crate::state::AppState;

/// Body of `PUT /admin/commandes/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Requested status; validated against the enum before the lifecycle
    /// table is consulted.
    #[serde(default)]
    pub status: String,
    /// Explicit operator override: bypass the transition table (e.g. to
    /// reopen a cancelled order).
    #[serde(default, rename = "override")]
    pub override_requested: bool,
}

/// All orders, newest first.
pub async fn index(
    RequireAuth(_admin): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<OrderWithItems>>>> {
    let commandes = OrderService::new(state.pool()).list_orders().await?;
    Ok(Json(ApiResponse::ok(commandes)))
}

/// One order with its line items.
pub async fn show(
    RequireAuth(_admin): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<OrderWithItems>>> {
    let commande = OrderService::new(state.pool())
        .get_order(OrderId::new(id))
        .await?;
    Ok(Json(ApiResponse::ok(commande)))
}

/// Change an order's status.
///
/// 409 when the lifecycle table rejects the transition and no override
/// was requested.
pub async fn update(
    RequireAuth(admin): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<OrderWithItems>>> {
    let status: OrderStatus = body.status.parse().map_err(|_| {
        let mut errors = ValidationErrors::new();
        errors.add("status", "must be one of pending, confirmed, cancelled");
        errors
    })?;

    let commande = OrderService::new(state.pool())
        .set_status(OrderId::new(id), status, body.override_requested)
        .await?;

    tracing::info!(
        admin = %admin.email,
        order_id = id,
        status = %status,
        override_requested = body.override_requested,
        "order status changed"
    );

    Ok(Json(ApiResponse::with_message("order updated", commande)))
}

/// Delete an order. Role `admin` only.
pub async fn destroy(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    OrderService::new(state.pool())
        .delete_order(OrderId::new(id))
        .await?;

    tracing::info!(admin = %admin.email, order_id = id, "order deleted");

    Ok(Json(ApiResponse::message_only("order deleted")))
}
