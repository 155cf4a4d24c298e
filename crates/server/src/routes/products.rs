//! Public product catalog routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::db::products::ProductRepository;
use crate::error::{ApiError, Result};
use crate::models::Product;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Build the public product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/featured", get(featured))
        .route("/category/{category}", get(by_category))
        .route("/{slug}", get(show))
}

/// All in-stock products.
async fn index(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let produits = ProductRepository::new(state.pool()).list_in_stock().await?;
    Ok(Json(ApiResponse::ok(produits)))
}

/// Featured in-stock products.
async fn featured(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let produits = ProductRepository::new(state.pool()).list_featured().await?;
    Ok(Json(ApiResponse::ok(produits)))
}

/// In-stock products in one category.
async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let produits = ProductRepository::new(state.pool())
        .list_by_category(&category)
        .await?;
    Ok(Json(ApiResponse::ok(produits)))
}

/// One product by slug.
async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Product>>> {
    let produit = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    Ok(Json(ApiResponse::ok(produit)))
}
