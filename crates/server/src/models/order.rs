//! Order domain types.
//!
//! Orders are immutable once created, except for the free-text `status`
//! field. Each item snapshots the product name and unit price at order time,
//! so later catalog edits never alter historical orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use atelie_core::{OrderId, OrderItemId, PaymentMethod, ProductId};

/// A persisted customer order.
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer name as entered at checkout.
    pub customer_name: String,
    /// Contact handle for the messaging hand-off.
    pub whatsapp: String,
    /// Optional city/state line.
    pub city_state: String,
    /// Optional delivery address.
    pub address: String,
    /// Free-text customer notes.
    pub notes: String,
    /// Selected payment method.
    pub payment_method: PaymentMethod,
    /// Amount actually charged (discounted for pix).
    pub amount: Decimal,
    /// Undiscounted cart total.
    pub amount_original: Decimal,
    /// Free-text status, managed by the admin.
    pub status: String,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// A line item of a persisted order.
#[derive(Debug, Clone)]
pub struct OrderItem {
    /// Unique item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Product referenced at order time (may no longer exist).
    pub product_id: ProductId,
    /// Product name at order time.
    pub product_name_snapshot: String,
    /// Unit price at order time.
    pub unit_price: Decimal,
    /// Ordered quantity.
    pub qty: i32,
}

/// Data for one order insert, items included.
///
/// Consumed by [`crate::db::orders::OrderRepository::create`], which writes
/// the order row and all item rows in a single transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub whatsapp: String,
    pub city_state: String,
    pub address: String,
    pub notes: String,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    pub amount_original: Decimal,
    pub status: String,
    pub items: Vec<NewOrderItem>,
}

/// One snapshotted line of a [`NewOrder`].
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name_snapshot: String,
    pub unit_price: Decimal,
    pub qty: i32,
}
