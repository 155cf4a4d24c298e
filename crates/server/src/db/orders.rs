//! Order repository.
//!
//! The order header and its line items are only ever written together, in
//! one transaction; see [`OrderRepository::create`]. Status changes go
//! through a row lock so the lifecycle check and the write are atomic.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use gala_core::{Email, OrderId, OrderStatus, ProductId};

use super::RepositoryError;
use crate::models::{Order, OrderLineItem, OrderWithItems};

/// Raw `orders` row.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    client_name: String,
    client_email: String,
    client_phone: String,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let client_email = Email::parse(&row.client_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let status = row.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            client_name: row.client_name,
            client_email,
            client_phone: row.client_phone,
            total: row.total,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Raw `order_items` row joined with the product name.
#[derive(sqlx::FromRow)]
struct ItemRow {
    order_id: i32,
    product_id: i32,
    name: String,
    quantity: i32,
    unit_price: Decimal,
}

impl From<ItemRow> for OrderLineItem {
    fn from(row: ItemRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            name: row.name,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

/// Header fields for a new order.
#[derive(Debug)]
pub struct NewOrder<'a> {
    pub client_name: &'a str,
    pub client_email: &'a Email,
    pub client_phone: &'a str,
    pub total: Decimal,
}

/// One line of a new order, with the price captured at intake.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order header and all of its line items atomically.
    ///
    /// If any insert fails the transaction rolls back and nothing is
    /// observable; a half-created order can never be read back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back in that case.
    pub async fn create(
        &self,
        order: NewOrder<'_>,
        items: &[NewLineItem],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (client_name, client_email, client_phone, total, status)
             VALUES ($1, $2, $3, $4, 'pending')
             RETURNING id, client_name, client_email, client_phone, total, status,
                       created_at, updated_at",
        )
        .bind(order.client_name)
        .bind(order.client_email.as_str())
        .bind(order.client_phone)
        .bind(order.total)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(row.id)
            .bind(item.product_id.as_i32())
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        row.try_into()
    }

    /// Fetch one order with its resolved line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_with_items(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, client_name, client_email, client_phone, total, status,
                    created_at, updated_at
             FROM orders
             WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let order: Order = row.try_into()?;
        let mut items = self.items_for(&[order.id]).await?;
        let produits = items.remove(&order.id.as_i32()).unwrap_or_default();

        Ok(Some(OrderWithItems { order, produits }))
    }

    /// All orders, newest first, with line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list(&self) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, client_name, client_email, client_phone, total, status,
                    created_at, updated_at
             FROM orders
             ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        self.with_items(rows).await
    }

    /// The most recent orders, newest first, with line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, client_name, client_email, client_phone, total, status,
                    created_at, updated_at
             FROM orders
             ORDER BY created_at DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        self.with_items(rows).await
    }

    /// Lock an order row for a status change.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn get_for_update(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        id: OrderId,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, client_name, client_email, client_phone, total, status,
                    created_at, updated_at
             FROM orders
             WHERE id = $1
             FOR UPDATE",
        )
        .bind(id.as_i32())
        .fetch_optional(&mut **tx)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Write a new status inside an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "UPDATE orders
             SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING id, client_name, client_email, client_phone, total, status,
                       created_at, updated_at",
        )
        .bind(id.as_i32())
        .bind(status.as_str())
        .fetch_optional(&mut **tx)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Begin a transaction on the underlying pool.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction cannot start.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, RepositoryError> {
        Ok(self.pool.begin().await?)
    }

    /// Delete an order and (by cascade) its line items.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Total number of orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Number of orders currently in a given status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_with_status(&self, status: OrderStatus) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Resolve line items for a set of orders in one query, grouped by
    /// order id.
    async fn items_for(
        &self,
        ids: &[OrderId],
    ) -> Result<HashMap<i32, Vec<OrderLineItem>>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT oi.order_id, oi.product_id, p.name, oi.quantity, oi.unit_price
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             WHERE oi.order_id = ANY($1)
             ORDER BY oi.id",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<i32, Vec<OrderLineItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row.into());
        }

        Ok(grouped)
    }

    /// Attach line items to a batch of header rows.
    async fn with_items(
        &self,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders: Vec<Order> = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<_, _>>()?;

        let ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();
        let mut items = self.items_for(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let produits = items.remove(&order.id.as_i32()).unwrap_or_default();
                OrderWithItems { order, produits }
            })
            .collect())
    }
}
