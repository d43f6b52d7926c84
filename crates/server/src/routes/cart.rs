//! Cart route handlers.
//!
//! The cart lives in the visitor's session; every view resolves it against
//! the live catalog so stale or deactivated products silently disappear.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use atelie_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::CartStore;
use crate::services::CartLine;
use crate::services::checkout::resolve_cart;
use crate::state::AppState;

/// Form field prefix used by the bulk quantity update.
const QTY_FIELD_PREFIX: &str = "qty_";

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub qty: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub store_name: String,
    pub cart_count: u32,
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

/// Display the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartTemplate> {
    let cart = CartStore::new(&session).load().await;
    let resolved = resolve_cart(state.pool(), &cart).await?;

    Ok(CartTemplate {
        store_name: state.store().name.clone(),
        cart_count: cart.item_count(),
        lines: resolved.lines,
        total: resolved.total,
    })
}

/// Add a product to the cart; 404 when the product is missing or inactive.
#[instrument(skip(state, session, form))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product = ProductRepository::new(state.pool())
        .get_active(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let qty = form
        .qty
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(1);

    let store = CartStore::new(&session);
    let mut cart = store.load().await;
    cart.add(product.id, qty);
    store.save(&cart).await?;

    Ok(Redirect::to("/carrinho"))
}

/// Bulk quantity update from the cart page form.
///
/// Fields are named `qty_{product_id}`; a non-positive or unparsable value
/// removes that line.
#[instrument(skip(session, form))]
pub async fn update(
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Redirect> {
    let store = CartStore::new(&session);
    let mut cart = store.load().await;

    for (key, raw_qty) in &form {
        if let Some(product_id) = key.strip_prefix(QTY_FIELD_PREFIX) {
            cart.update_line(product_id, raw_qty);
        }
    }

    store.save(&cart).await?;
    Ok(Redirect::to("/carrinho"))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Redirect> {
    CartStore::new(&session).clear().await?;
    Ok(Redirect::to("/"))
}
