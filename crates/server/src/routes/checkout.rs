//! Checkout route handlers: checkout page, order creation, confirmation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use atelie_core::{OrderId, PaymentMethod, pricing};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{CartStore, Order, OrderItem};
use crate::services::CartLine;
use crate::services::checkout::{
    CheckoutError, OrderRequest, compose_handoff_message, place_order, resolve_cart,
};
use crate::state::AppState;

/// Checkout form data. Everything is optional on the wire; validation
/// happens in the order materializer after trimming.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub payment_method: Option<String>,
    pub customer_name: Option<String>,
    pub whatsapp: Option<String>,
    pub city_state: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl CheckoutForm {
    fn into_request(self) -> OrderRequest {
        OrderRequest {
            customer_name: trimmed(self.customer_name),
            whatsapp: trimmed(self.whatsapp),
            city_state: trimmed(self.city_state),
            address: trimmed(self.address),
            notes: trimmed(self.notes),
            payment_method: PaymentMethod::from_form(self.payment_method.as_deref()),
        }
    }
}

fn trimmed(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub store_name: String,
    pub cart_count: u32,
    pub lines: Vec<CartLine>,
    pub total: Decimal,
    pub total_pix: Decimal,
    pub pix_discount_percent: u8,
    pub pix_key: String,
    pub pix_receiver: String,
    pub payment_link: Option<String>,
    pub error: Option<String>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "order_success.html")]
pub struct OrderSuccessTemplate {
    pub store_name: String,
    pub cart_count: u32,
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub whatsapp_message: String,
    pub pix_key: String,
    pub pix_receiver: String,
    pub payment_link: Option<String>,
}

/// Build the checkout page from the current session cart.
async fn checkout_page(
    state: &AppState,
    session: &Session,
    error: Option<String>,
) -> Result<Option<CheckoutTemplate>> {
    let cart = CartStore::new(session).load().await;
    let resolved = resolve_cart(state.pool(), &cart).await?;
    if resolved.is_empty() {
        return Ok(None);
    }

    let store = state.store();
    let total_pix = pricing::price_with_discount(resolved.total, store.pix_discount_percent);

    Ok(Some(CheckoutTemplate {
        store_name: store.name.clone(),
        cart_count: cart.item_count(),
        lines: resolved.lines,
        total: resolved.total,
        total_pix,
        pix_discount_percent: store.pix_discount_percent,
        pix_key: store.pix_key.clone(),
        pix_receiver: store.pix_receiver.clone(),
        payment_link: store.payment_link.clone(),
        error,
    }))
}

/// Display the checkout page; an empty cart redirects home.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    match checkout_page(&state, &session, None).await? {
        Some(page) => Ok(page.into_response()),
        None => Ok(Redirect::to("/").into_response()),
    }
}

/// Create an order from the session cart and the submitted customer fields.
///
/// On success the cart is cleared and the customer is redirected to the
/// confirmation page. Validation failures re-render the checkout form with
/// a message; an empty cart redirects home.
#[instrument(skip(state, session, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let store = CartStore::new(&session);
    let cart = store.load().await;

    match place_order(state.pool(), state.store(), &cart, form.into_request()).await {
        Ok(order_id) => {
            store.clear().await?;
            Ok(Redirect::to(&format!("/pedido/{order_id}/sucesso")).into_response())
        }
        Err(CheckoutError::EmptyCart) => Ok(Redirect::to("/").into_response()),
        Err(err @ CheckoutError::MissingContact) => {
            match checkout_page(&state, &session, Some(err.to_string())).await? {
                Some(page) => Ok(page.into_response()),
                None => Ok(Redirect::to("/").into_response()),
            }
        }
        Err(CheckoutError::Repository(err)) => Err(err.into()),
    }
}

/// Order confirmation page with the composed hand-off message.
#[instrument(skip(state, session))]
pub async fn success(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<OrderSuccessTemplate> {
    let orders = OrderRepository::new(state.pool());

    let order = orders
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    let items = orders.items(order.id).await?;

    let store = state.store();
    let whatsapp_message = compose_handoff_message(store, &order, &items);

    Ok(OrderSuccessTemplate {
        store_name: store.name.clone(),
        cart_count: super::cart_count(&session).await,
        order,
        items,
        whatsapp_message,
        pix_key: store.pix_key.clone(),
        pix_receiver: store.pix_receiver.clone(),
        payment_link: store.payment_link.clone(),
    })
}
