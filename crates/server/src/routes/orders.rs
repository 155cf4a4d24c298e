//! Public order routes: place an order, track an order.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use gala_core::OrderId;

use crate::error::Result;
use crate::models::{Order, OrderLineItem, OrderWithItems};
use crate::response::ApiResponse;
use crate::services::{OrderService, PlaceOrderRequest};
use crate::state::AppState;

/// Payload of a successful `POST /commandes`.
#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub commande: Order,
    pub produits: Vec<OrderLineItem>,
}

/// Place an order. Public — no authentication.
///
/// 201 with the created order on success, 422 with field errors when the
/// request or a product reference is invalid, 500 with everything rolled
/// back on unexpected failure.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderCreated>>)> {
    let placed = OrderService::new(state.pool()).place_order(&request).await?;

    tracing::info!(
        order_id = %placed.order.id,
        total = %placed.order.total,
        lines = placed.produits.len(),
        "order placed"
    );

    let data = OrderCreated {
        commande: placed.order,
        produits: placed.produits,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("order created", data)),
    ))
}

/// Track one order. Public read, mirrors the storefront "track my order"
/// page.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<OrderWithItems>>> {
    let order = OrderService::new(state.pool())
        .get_order(OrderId::new(id))
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}
