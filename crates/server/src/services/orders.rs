//! Order intake and lifecycle service.
//!
//! `place_order` is the only write path for orders: it validates the
//! request shape, resolves every referenced product, computes the
//! authoritative total from the resolved prices, and hands the whole thing
//! to the repository as one atomic unit. Nothing is persisted unless every
//! step succeeds.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use gala_core::{Email, OrderId, OrderStatus, ProductId};

use crate::db::RepositoryError;
use crate::db::orders::{NewLineItem, NewOrder, OrderRepository};
use crate::db::products::ProductRepository;
use crate::error::{ApiError, ValidationErrors};
use crate::models::{Order, OrderLineItem, OrderWithItems, Product};

const MAX_NAME_LENGTH: usize = 255;
const MAX_PHONE_LENGTH: usize = 50;

/// Body of `POST /commandes`.
///
/// Every field defaults so that a missing field surfaces as a field-level
/// validation message instead of a body-level deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub produits: Vec<OrderLineRequest>,
}

/// One requested line: a product reference and a quantity.
#[derive(Debug, Default, Deserialize)]
pub struct OrderLineRequest {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub quantity: i32,
}

/// A request that passed shape validation.
#[derive(Debug)]
struct ValidOrder {
    client_name: String,
    client_email: Email,
    client_phone: String,
    lines: Vec<(ProductId, i32)>,
}

/// Result of a successful `place_order`.
#[derive(Debug)]
pub struct PlacedOrder {
    pub order: Order,
    pub produits: Vec<OrderLineItem>,
}

/// Order intake and lifecycle service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Validate, price and persist an order as one atomic unit.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for malformed fields or unknown
    /// product references (nothing persisted), or `ApiError::Database` if
    /// the transaction fails (rolled back).
    pub async fn place_order(&self, request: &PlaceOrderRequest) -> Result<PlacedOrder, ApiError> {
        let valid = validate(request)?;

        let ids: Vec<i32> = valid.lines.iter().map(|(id, _)| id.as_i32()).collect();
        let resolved = self.products.get_by_ids(&ids).await?;
        let by_id: HashMap<i32, &Product> =
            resolved.iter().map(|p| (p.id.as_i32(), p)).collect();

        // Every referenced product must exist; reject the whole order on
        // the first missing one rather than pricing a subset.
        let mut errors = ValidationErrors::new();
        for (index, (product_id, _)) in valid.lines.iter().enumerate() {
            if !by_id.contains_key(&product_id.as_i32()) {
                errors.add(
                    format!("produits.{index}.id"),
                    "unknown product reference",
                );
            }
        }
        errors.into_result()?;

        let mut items = Vec::with_capacity(valid.lines.len());
        let mut produits = Vec::with_capacity(valid.lines.len());
        for &(product_id, quantity) in &valid.lines {
            let Some(product) = by_id.get(&product_id.as_i32()) else {
                // Unreachable after the check above; keep the whole
                // operation failing closed anyway.
                return Err(ApiError::Internal("product resolution lost a line".into()));
            };
            items.push(NewLineItem {
                product_id,
                quantity,
                unit_price: product.price,
            });
            produits.push(OrderLineItem {
                product_id,
                name: product.name.clone(),
                quantity,
                unit_price: product.price,
            });
        }

        let total = compute_total(&items);

        let order = self
            .orders
            .create(
                NewOrder {
                    client_name: &valid.client_name,
                    client_email: &valid.client_email,
                    client_phone: &valid.client_phone,
                    total,
                },
                &items,
            )
            .await?;

        Ok(PlacedOrder { order, produits })
    }

    /// Fetch one order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the id does not exist.
    pub async fn get_order(&self, id: OrderId) -> Result<OrderWithItems, ApiError> {
        self.orders
            .get_with_items(id)
            .await?
            .ok_or(ApiError::NotFound("order"))
    }

    /// All orders for the admin surface, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Database` if the read fails.
    pub async fn list_orders(&self) -> Result<Vec<OrderWithItems>, ApiError> {
        Ok(self.orders.list().await?)
    }

    /// Most recent orders for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Database` if the read fails.
    pub async fn list_recent_orders(&self, limit: i64) -> Result<Vec<OrderWithItems>, ApiError> {
        Ok(self.orders.list_recent(limit).await?)
    }

    /// Change an order's status under the lifecycle table.
    ///
    /// The read-check-write runs under a row lock so two concurrent admin
    /// writes cannot both pass the transition check.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist, or
    /// `ApiError::Transition` if the lifecycle table rejects the change
    /// and no override was requested.
    pub async fn set_status(
        &self,
        id: OrderId,
        new_status: OrderStatus,
        override_requested: bool,
    ) -> Result<OrderWithItems, ApiError> {
        let mut tx = self.orders.begin().await?;

        let current = self
            .orders
            .get_for_update(&mut tx, id)
            .await
            .map_err(not_found_as("order"))?;

        let next = current.status.transition(new_status, override_requested)?;
        self.orders.update_status(&mut tx, id, next).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        self.get_order(id).await
    }

    /// Delete an order and its line items.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist.
    pub async fn delete_order(&self, id: OrderId) -> Result<(), ApiError> {
        if self.orders.delete(id).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound("order"))
        }
    }
}

/// Map a repository not-found onto a named 404.
fn not_found_as(what: &'static str) -> impl Fn(RepositoryError) -> ApiError {
    move |err| match err {
        RepositoryError::NotFound => ApiError::NotFound(what),
        other => other.into(),
    }
}

/// Authoritative order total: Σ(unit price × quantity) over the captured
/// lines.
fn compute_total(items: &[NewLineItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.unit_price * Decimal::from(item.quantity))
        .sum()
}

/// Shape validation for an intake request. Pure; touches no I/O.
fn validate(request: &PlaceOrderRequest) -> Result<ValidOrder, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let client_name = request.client_name.trim();
    if client_name.is_empty() {
        errors.add("client_name", "required");
    } else if client_name.len() > MAX_NAME_LENGTH {
        errors.add(
            "client_name",
            format!("must be at most {MAX_NAME_LENGTH} characters"),
        );
    }

    let client_email = match request.client_email.trim() {
        "" => {
            errors.add("client_email", "required");
            None
        }
        raw => match Email::parse(raw) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.add("client_email", e.to_string());
                None
            }
        },
    };

    let client_phone = request.client_phone.trim();
    if client_phone.is_empty() {
        errors.add("client_phone", "required");
    } else if client_phone.len() > MAX_PHONE_LENGTH {
        errors.add(
            "client_phone",
            format!("must be at most {MAX_PHONE_LENGTH} characters"),
        );
    }

    if request.produits.is_empty() {
        errors.add("produits", "at least one product is required");
    }

    let mut seen = HashSet::new();
    let mut lines = Vec::with_capacity(request.produits.len());
    for (index, line) in request.produits.iter().enumerate() {
        if line.id < 1 {
            errors.add(format!("produits.{index}.id"), "required");
        } else if !seen.insert(line.id) {
            errors.add(format!("produits.{index}.id"), "duplicate product reference");
        }

        if line.quantity < 1 {
            errors.add(format!("produits.{index}.quantity"), "must be at least 1");
        }

        lines.push((ProductId::new(line.id), line.quantity));
    }

    errors.into_result()?;

    // client_email is always Some here: a None recorded an error above.
    let Some(client_email) = client_email else {
        let mut errors = ValidationErrors::new();
        errors.add("client_email", "required");
        return Err(errors);
    };

    Ok(ValidOrder {
        client_name: client_name.to_owned(),
        client_email,
        client_phone: client_phone.to_owned(),
        lines,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i32, quantity: i32) -> OrderLineRequest {
        OrderLineRequest { id, quantity }
    }

    fn valid_request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            client_name: "Jean Dupont".to_string(),
            client_email: "jean@x.com".to_string(),
            client_phone: "0700000000".to_string(),
            produits: vec![line(1, 2), line(2, 1)],
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let valid = validate(&valid_request()).unwrap();
        assert_eq!(valid.client_name, "Jean Dupont");
        assert_eq!(valid.client_email.as_str(), "jean@x.com");
        assert_eq!(
            valid.lines,
            vec![(ProductId::new(1), 2), (ProductId::new(2), 1)]
        );
    }

    #[test]
    fn test_validate_requires_every_client_field() {
        let errors = validate(&PlaceOrderRequest::default()).unwrap_err();
        assert!(errors.field("client_name").is_some());
        assert!(errors.field("client_email").is_some());
        assert!(errors.field("client_phone").is_some());
        assert!(errors.field("produits").is_some());
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut request = valid_request();
        request.client_email = "not-an-email".to_string();
        let errors = validate(&request).unwrap_err();
        assert!(errors.field("client_email").is_some());
    }

    #[test]
    fn test_validate_rejects_zero_and_negative_quantities() {
        let mut request = valid_request();
        request.produits = vec![line(1, 0), line(2, -3)];
        let errors = validate(&request).unwrap_err();
        assert!(errors.field("produits.0.quantity").is_some());
        assert!(errors.field("produits.1.quantity").is_some());
    }

    #[test]
    fn test_validate_rejects_duplicate_product_references() {
        let mut request = valid_request();
        request.produits = vec![line(1, 2), line(1, 1)];
        let errors = validate(&request).unwrap_err();
        assert!(errors.field("produits.0.id").is_none());
        assert_eq!(
            errors.field("produits.1.id"),
            Some(&["duplicate product reference".to_string()][..])
        );
    }

    #[test]
    fn test_validate_trims_whitespace() {
        let mut request = valid_request();
        request.client_name = "  Jean Dupont  ".to_string();
        request.client_phone = " 0700000000 ".to_string();
        let valid = validate(&request).unwrap();
        assert_eq!(valid.client_name, "Jean Dupont");
        assert_eq!(valid.client_phone, "0700000000");
    }

    #[test]
    fn test_compute_total_matches_reference_scenario() {
        // Product 1 costs 5000 × 2, product 2 costs 3000 × 1.
        let items = vec![
            NewLineItem {
                product_id: ProductId::new(1),
                quantity: 2,
                unit_price: Decimal::from(5000),
            },
            NewLineItem {
                product_id: ProductId::new(2),
                quantity: 1,
                unit_price: Decimal::from(3000),
            },
        ];

        assert_eq!(compute_total(&items), Decimal::from(13000));
    }

    #[test]
    fn test_compute_total_keeps_decimal_precision() {
        // 19.99 × 3 = 59.97
        let items = vec![NewLineItem {
            product_id: ProductId::new(1),
            quantity: 3,
            unit_price: Decimal::new(1999, 2),
        }];

        assert_eq!(compute_total(&items), Decimal::new(5997, 2));
    }

    #[test]
    fn test_compute_total_of_nothing_is_zero() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
    }
}
