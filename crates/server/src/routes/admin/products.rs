//! Admin product management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;

use gala_core::ProductId;

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::error::{ApiError, Result, ValidationErrors};
use crate::middleware::RequireAuth;
use crate::models::{Product, ProductDraft};
use crate::response::ApiResponse;
use crate::state::AppState;

const MAX_NAME_LENGTH: usize = 255;

/// Every product, including out-of-stock ones.
pub async fn index(
    RequireAuth(_admin): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let produits = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(ApiResponse::ok(produits)))
}

/// Create a product.
pub async fn create(
    RequireAuth(admin): RequireAuth,
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    validate_draft(&draft)?;

    let produit = ProductRepository::new(state.pool())
        .create(&draft)
        .await
        .map_err(slug_conflict_as_validation)?;

    tracing::info!(admin = %admin.email, product_id = %produit.id, "product created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("product created", produit)),
    ))
}

/// Replace a product's fields.
pub async fn update(
    RequireAuth(admin): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<ApiResponse<Product>>> {
    validate_draft(&draft)?;

    let produit = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &draft)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("product"),
            other => slug_conflict_as_validation(other),
        })?;

    tracing::info!(admin = %admin.email, product_id = id, "product updated");

    Ok(Json(ApiResponse::with_message("product updated", produit)))
}

/// Delete a product.
pub async fn destroy(
    RequireAuth(admin): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(ApiError::NotFound("product"));
    }

    tracing::info!(admin = %admin.email, product_id = id, "product deleted");

    Ok(Json(ApiResponse::message_only("product deleted")))
}

/// A taken slug surfaces as a field error, not an internal failure.
fn slug_conflict_as_validation(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::Conflict(_) => {
            let mut errors = ValidationErrors::new();
            errors.add("slug", "already in use");
            ApiError::Validation(errors)
        }
        other => other.into(),
    }
}

/// Shape validation for an admin product draft.
fn validate_draft(draft: &ProductDraft) -> std::result::Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if draft.name.trim().is_empty() {
        errors.add("name", "required");
    } else if draft.name.len() > MAX_NAME_LENGTH {
        errors.add("name", format!("must be at most {MAX_NAME_LENGTH} characters"));
    }

    let slug = draft.slug.trim();
    if slug.is_empty() {
        errors.add("slug", "required");
    } else if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        errors.add("slug", "may only contain lowercase letters, digits and dashes");
    }

    if draft.description.trim().is_empty() {
        errors.add("description", "required");
    }

    if draft.category.trim().is_empty() {
        errors.add("category", "required");
    }

    if draft.price < Decimal::ZERO {
        errors.add("price", "must not be negative");
    }

    errors.into_result()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Pack décoration".to_string(),
            slug: "pack-decoration".to_string(),
            description: "Décoration complète de salle".to_string(),
            price: Decimal::from(50_000),
            image: None,
            category: "decoration".to_string(),
            in_stock: true,
            featured: false,
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(validate_draft(&draft()).is_ok());
    }

    #[test]
    fn test_rejects_bad_slug() {
        let mut d = draft();
        d.slug = "Pack Décoration".to_string();
        let errors = validate_draft(&d).unwrap_err();
        assert!(errors.field("slug").is_some());
    }

    #[test]
    fn test_rejects_negative_price() {
        let mut d = draft();
        d.price = Decimal::from(-1);
        let errors = validate_draft(&d).unwrap_err();
        assert!(errors.field("price").is_some());
    }

    #[test]
    fn test_rejects_empty_fields() {
        let d = ProductDraft {
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            price: Decimal::ZERO,
            image: None,
            category: String::new(),
            in_stock: true,
            featured: false,
        };
        let errors = validate_draft(&d).unwrap_err();
        assert!(errors.field("name").is_some());
        assert!(errors.field("slug").is_some());
        assert!(errors.field("description").is_some());
        assert!(errors.field("category").is_some());
        // zero price is allowed, only negative is rejected
        assert!(errors.field("price").is_none());
    }
}
