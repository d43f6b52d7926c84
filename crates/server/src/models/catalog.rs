//! Catalog domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use atelie_core::{ProductId, ProductImageId};

/// A product in the catalog.
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Unit price, two decimal places.
    pub price: Decimal,
    /// Inactive products are hidden from the storefront and dropped from carts.
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// An uploaded image belonging to a product.
///
/// Rows cascade-delete with their product; the backing file is removed
/// best-effort afterwards.
#[derive(Debug, Clone)]
pub struct ProductImage {
    /// Unique image ID.
    pub id: ProductImageId,
    /// Owning product.
    pub product_id: ProductId,
    /// Public URL path of the stored file.
    pub image_url: String,
    /// When the image was uploaded.
    pub created_at: DateTime<Utc>,
}
