//! Catalog route handlers: listing with search, and product detail.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use atelie_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{Product, ProductImage};
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// One product card on the listing page.
pub struct ProductCard {
    pub product: Product,
    pub thumb: Option<String>,
}

/// Catalog listing template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub store_name: String,
    pub cart_count: u32,
    pub q: String,
    pub products: Vec<ProductCard>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub store_name: String,
    pub cart_count: u32,
    pub product: Product,
    pub images: Vec<ProductImage>,
}

/// Catalog listing: active products, newest first, optionally filtered by a
/// case-insensitive substring match on the name.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<IndexTemplate> {
    let q = query.q.unwrap_or_default().trim().to_string();
    let search = (!q.is_empty()).then_some(q.as_str());

    let products = ProductRepository::new(state.pool())
        .list_active(search)
        .await?
        .into_iter()
        .map(|(product, thumb)| ProductCard { product, thumb })
        .collect();

    Ok(IndexTemplate {
        store_name: state.store().name.clone(),
        cart_count: super::cart_count(&session).await,
        q,
        products,
    })
}

/// Product detail page; 404 when the product is missing or inactive.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<ProductTemplate> {
    let products = ProductRepository::new(state.pool());

    let product = products
        .get_active(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let images = products.images(product.id).await?;

    Ok(ProductTemplate {
        store_name: state.store().name.clone(),
        cart_count: super::cart_count(&session).await,
        product,
        images,
    })
}
