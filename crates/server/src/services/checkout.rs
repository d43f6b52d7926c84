//! Cart resolution and the order materializer.
//!
//! The cart only stores product ids and quantities; everything priced is
//! recomputed here against the live catalog. Lines whose product vanished or
//! went inactive are silently dropped rather than failing the request.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use atelie_core::{Cart, OrderId, PaymentMethod, ProductId, pricing};

use crate::config::StoreConfig;
use crate::db::{OrderRepository, ProductRepository, RepositoryError};
use crate::filters::format_brl;
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem, Product};

/// Status given to every freshly created order.
pub const INITIAL_STATUS: &str = "Aguardando pagamento";

/// One cart line resolved against the catalog.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product: Product,
    pub qty: u32,
    pub subtotal: Decimal,
}

/// A cart resolved against the catalog: surviving lines plus their total.
#[derive(Debug, Clone)]
pub struct ResolvedCart {
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

impl ResolvedCart {
    /// Whether no line survived resolution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Why a checkout submission was rejected.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No cart line survived resolution.
    #[error("Seu carrinho está vazio.")]
    EmptyCart,

    /// Customer name or contact handle was blank.
    #[error("Informe seu nome e WhatsApp para finalizar.")]
    MissingContact,

    /// Database operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Customer-supplied checkout fields, already trimmed by the route handler.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub customer_name: String,
    pub whatsapp: String,
    pub city_state: String,
    pub address: String,
    pub notes: String,
    pub payment_method: PaymentMethod,
}

/// Resolve the cart against the live catalog.
///
/// Unparsable ids and products that are missing or inactive are dropped
/// silently; each surviving line gets `price × qty` rounded to the cent and
/// the total is the sum of the line subtotals.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a catalog query fails.
pub async fn resolve_cart(pool: &PgPool, cart: &Cart) -> Result<ResolvedCart, RepositoryError> {
    let products = ProductRepository::new(pool);

    let mut lines = Vec::new();
    let mut total = Decimal::ZERO;

    for (raw_id, qty) in cart.lines() {
        let Ok(id) = raw_id.parse::<i32>() else {
            continue;
        };
        let Some(product) = products.get_active(ProductId::new(id)).await? else {
            continue;
        };

        let subtotal = pricing::line_subtotal(product.price, qty);
        total += subtotal;
        lines.push(CartLine {
            product,
            qty,
            subtotal,
        });
    }

    Ok(ResolvedCart { lines, total })
}

/// Materialize the cart into a persisted order.
///
/// Recomputes the total from current product prices, applies the pix
/// discount when eligible, and writes the order row plus one snapshotted
/// item row per surviving line in a single transaction. The caller clears
/// the cart after success; a repeated submission creates a second order.
///
/// # Errors
///
/// Returns `CheckoutError::MissingContact` if name or contact is blank,
/// `CheckoutError::EmptyCart` if no line survives resolution, or a
/// repository error if persisting fails.
pub async fn place_order(
    pool: &PgPool,
    store: &StoreConfig,
    cart: &Cart,
    request: OrderRequest,
) -> Result<OrderId, CheckoutError> {
    if request.customer_name.is_empty() || request.whatsapp.is_empty() {
        return Err(CheckoutError::MissingContact);
    }

    let resolved = resolve_cart(pool, cart).await?;
    if resolved.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let amount_original = resolved.total;
    let amount = pricing::effective_amount(
        amount_original,
        request.payment_method,
        store.pix_discount_percent,
    );

    let items = resolved
        .lines
        .iter()
        .map(|line| NewOrderItem {
            product_id: line.product.id,
            product_name_snapshot: line.product.name.clone(),
            unit_price: line.product.price,
            qty: i32::try_from(line.qty).unwrap_or(i32::MAX),
        })
        .collect();

    let order_id = OrderRepository::new(pool)
        .create(NewOrder {
            customer_name: request.customer_name,
            whatsapp: request.whatsapp,
            city_state: request.city_state,
            address: request.address,
            notes: request.notes,
            payment_method: request.payment_method,
            amount,
            amount_original,
            status: INITIAL_STATUS.to_string(),
            items,
        })
        .await?;

    Ok(order_id)
}

/// Compose the plain-text summary handed off to the messaging channel.
#[must_use]
pub fn compose_handoff_message(store: &StoreConfig, order: &Order, items: &[OrderItem]) -> String {
    let mut lines = vec![
        format!("Olá! Fiz um pedido na loja {}.", store.name),
        format!("Pedido: #{}", order.id),
    ];
    for item in items {
        lines.push(format!(
            "- {}x {} ({})",
            item.qty,
            item.product_name_snapshot,
            format_brl(item.unit_price)
        ));
    }
    lines.push(format!("Total: {}", format_brl(order.amount)));
    lines.push(format!("Pagamento: {}", order.payment_method.label()));
    if order.payment_method == PaymentMethod::Pix {
        lines.push(format!("Chave Pix: {}", store.pix_key));
    }
    lines.join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use atelie_core::{OrderItemId, ProductId};

    use super::*;

    fn test_store() -> StoreConfig {
        StoreConfig {
            name: "Ateliê".to_string(),
            pix_key: "chave@atelie.example".to_string(),
            pix_receiver: "Ateliê".to_string(),
            pix_discount_percent: 10,
            payment_link: None,
        }
    }

    fn test_order(payment_method: PaymentMethod) -> Order {
        Order {
            id: OrderId::new(42),
            customer_name: "Maria".to_string(),
            whatsapp: "+55 11 91234-5678".to_string(),
            city_state: String::new(),
            address: String::new(),
            notes: String::new(),
            payment_method,
            amount: "216.00".parse().unwrap(),
            amount_original: "240.00".parse().unwrap(),
            status: INITIAL_STATUS.to_string(),
            created_at: Utc::now(),
        }
    }

    fn test_items() -> Vec<OrderItem> {
        vec![OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(42),
            product_id: ProductId::new(7),
            product_name_snapshot: "Bolsa Floral".to_string(),
            unit_price: "120.00".parse().unwrap(),
            qty: 2,
        }]
    }

    #[test]
    fn handoff_message_lists_items_total_and_pix_key() {
        let message =
            compose_handoff_message(&test_store(), &test_order(PaymentMethod::Pix), &test_items());

        assert_eq!(
            message,
            "Olá! Fiz um pedido na loja Ateliê.\n\
             Pedido: #42\n\
             - 2x Bolsa Floral (R$ 120,00)\n\
             Total: R$ 216,00\n\
             Pagamento: Pix\n\
             Chave Pix: chave@atelie.example"
        );
    }

    #[test]
    fn handoff_message_omits_pix_key_for_card() {
        let mut order = test_order(PaymentMethod::Card);
        order.amount = order.amount_original;

        let message = compose_handoff_message(&test_store(), &order, &test_items());

        assert!(message.contains("Pagamento: Cartão"));
        assert!(!message.contains("Chave Pix"));
        assert!(message.contains("Total: R$ 240,00"));
    }
}
