//! Order repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use atelie_core::{OrderId, OrderItemId, PaymentMethod, ProductId};

use super::RepositoryError;
use crate::models::{NewOrder, Order, OrderItem};

/// Internal row type for `orders` queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_name: String,
    whatsapp: String,
    city_state: String,
    address: String,
    notes: String,
    payment_method: String,
    amount: Decimal,
    amount_original: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let payment_method = PaymentMethod::parse(&row.payment_method).ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "unknown payment method in database: {}",
                row.payment_method
            ))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            customer_name: row.customer_name,
            whatsapp: row.whatsapp,
            city_state: row.city_state,
            address: row.address,
            notes: row.notes,
            payment_method,
            amount: row.amount,
            amount_original: row.amount_original,
            status: row.status,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for `order_item` queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    product_name_snapshot: String,
    unit_price: Decimal,
    qty: i32,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            product_name_snapshot: row.product_name_snapshot,
            unit_price: row.unit_price,
            qty: row.qty,
        }
    }
}

const ORDER_COLUMNS: &str = "id, customer_name, whatsapp, city_state, address, notes, \
     payment_method, amount, amount_original, status, created_at";

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

    /// Persist an order and all its line items in a single transaction.
    ///
    /// This is the only operation that creates customer-facing financial
    /// records; any failure rolls the whole order back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn create(&self, new_order: NewOrder) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO orders (customer_name, whatsapp, city_state, address, notes, \
             payment_method, amount, amount_original, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id",
        )
        .bind(&new_order.customer_name)
        .bind(&new_order.whatsapp)
        .bind(&new_order.city_state)
        .bind(&new_order.address)
        .bind(&new_order.notes)
        .bind(new_order.payment_method.as_str())
        .bind(new_order.amount)
        .bind(new_order.amount_original)
        .bind(&new_order.status)
        .fetch_one(&mut *tx)
        .await?;

        for item in &new_order.items {
            sqlx::query(
                "INSERT INTO order_item (order_id, product_id, product_name_snapshot, \
                 unit_price, qty) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(&item.product_name_snapshot)
            .bind(item.unit_price)
            .bind(item.qty)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(OrderId::new(order_id))
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List the most recent orders for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List an order's line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, product_id, product_name_snapshot, unit_price, qty \
             FROM order_item WHERE order_id = $1 ORDER BY id ASC",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Overwrite an order's free-text status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(&self, id: OrderId, status: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
