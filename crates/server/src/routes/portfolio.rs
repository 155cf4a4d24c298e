//! Public portfolio routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use gala_core::PortfolioId;

use crate::db::portfolio::PortfolioRepository;
use crate::error::{ApiError, Result};
use crate::models::PortfolioItem;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/featured", get(featured))
        .route("/category/{category}", get(by_category))
        .route("/{id}", get(show))
}

async fn index(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<PortfolioItem>>>> {
    let items = PortfolioRepository::new(state.pool()).list().await?;
    Ok(Json(ApiResponse::ok(items)))
}

async fn featured(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PortfolioItem>>>> {
    let items = PortfolioRepository::new(state.pool()).list_featured().await?;
    Ok(Json(ApiResponse::ok(items)))
}

async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<Vec<PortfolioItem>>>> {
    let items = PortfolioRepository::new(state.pool())
        .list_by_category(&category)
        .await?;
    Ok(Json(ApiResponse::ok(items)))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PortfolioItem>>> {
    let item = PortfolioRepository::new(state.pool())
        .get(PortfolioId::new(id))
        .await?
        .ok_or(ApiError::NotFound("portfolio item"))?;
    Ok(Json(ApiResponse::ok(item)))
}
