//! Public service catalog routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::db::services::ServiceRepository;
use crate::error::{ApiError, Result};
use crate::models::Service;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/featured", get(featured))
        .route("/category/{category}", get(by_category))
        .route("/{slug}", get(show))
}

async fn index(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Service>>>> {
    let services = ServiceRepository::new(state.pool()).list().await?;
    Ok(Json(ApiResponse::ok(services)))
}

async fn featured(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Service>>>> {
    let services = ServiceRepository::new(state.pool()).list_featured().await?;
    Ok(Json(ApiResponse::ok(services)))
}

async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<Vec<Service>>>> {
    let services = ServiceRepository::new(state.pool())
        .list_by_category(&category)
        .await?;
    Ok(Json(ApiResponse::ok(services)))
}

async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Service>>> {
    let service = ServiceRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or(ApiError::NotFound("service"))?;
    Ok(Json(ApiResponse::ok(service)))
}
