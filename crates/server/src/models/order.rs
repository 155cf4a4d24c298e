//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use gala_core::{Email, OrderId, OrderStatus, ProductId};

/// An order header.
///
/// `total` is computed once at intake from the prices captured on the line
/// items and is never recomputed afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub client_name: String,
    pub client_email: Email,
    pub client_phone: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One product line belonging to an order.
///
/// `unit_price` is the product price at the moment the order was placed;
/// later catalog edits do not touch it. `name` is resolved live for
/// display.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// An order together with its resolved line items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub produits: Vec<OrderLineItem>,
}
