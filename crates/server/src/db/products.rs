//! Catalog repository: products and their images.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use atelie_core::{ProductId, ProductImageId};

use super::RepositoryError;
use crate::models::{Product, ProductImage};

/// Internal row type for `product` queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for catalog listings: a product plus its first image.
#[derive(Debug, sqlx::FromRow)]
struct ProductCardRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    thumb: Option<String>,
}

impl ProductCardRow {
    fn into_card(self) -> (Product, Option<String>) {
        let Self {
            id,
            name,
            description,
            price,
            is_active,
            created_at,
            thumb,
        } = self;
        (
            Product {
                id: ProductId::new(id),
                name,
                description,
                price,
                is_active,
                created_at,
            },
            thumb,
        )
    }
}

/// Internal row type for `product_image` queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductImageRow {
    id: i32,
    product_id: i32,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl From<ProductImageRow> for ProductImage {
    fn from(row: ProductImageRow) -> Self {
        Self {
            id: ProductImageId::new(row.id),
            product_id: ProductId::new(row.product_id),
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, price, is_active, created_at";
const THUMB_SUBQUERY: &str = "(SELECT pi.image_url FROM product_image pi \
     WHERE pi.product_id = product.id \
     ORDER BY pi.created_at ASC, pi.id ASC LIMIT 1) AS thumb";

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products newest first, each with its first image, with an
    /// optional case-insensitive name filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<(Product, Option<String>)>, RepositoryError> {
        let rows = if let Some(q) = search {
            sqlx::query_as::<_, ProductCardRow>(&format!(
                "SELECT {PRODUCT_COLUMNS}, {THUMB_SUBQUERY} FROM product \
                 WHERE is_active AND name ILIKE $1 ORDER BY created_at DESC"
            ))
            .bind(format!("%{q}%"))
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, ProductCardRow>(&format!(
                "SELECT {PRODUCT_COLUMNS}, {THUMB_SUBQUERY} FROM product \
                 WHERE is_active ORDER BY created_at DESC"
            ))
            .fetch_all(self.pool)
            .await?
        };

        Ok(rows.into_iter().map(ProductCardRow::into_card).collect())
    }

    /// List all products for the admin, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product by ID regardless of active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get an active product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1 AND is_active"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Count all products (used by the bootstrap seeder).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Create a product together with its image rows, in one transaction.
    ///
    /// Image files must already be stored; `image_urls` are their public
    /// paths.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        price: Decimal,
        is_active: bool,
        image_urls: &[String],
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO product (name, description, price, is_active) \
             VALUES ($1, $2, $3, $4) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(is_active)
        .fetch_one(&mut *tx)
        .await?;

        for url in image_urls {
            sqlx::query("INSERT INTO product_image (product_id, image_url) VALUES ($1, $2)")
                .bind(row.id)
                .bind(url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(row.into())
    }

    /// Update a product and append any newly uploaded image rows, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        name: &str,
        description: &str,
        price: Decimal,
        is_active: bool,
        new_image_urls: &[String],
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE product SET name = $1, description = $2, price = $3, is_active = $4 \
             WHERE id = $5 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(is_active)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        for url in new_image_urls {
            sqlx::query("INSERT INTO product_image (product_id, image_url) VALUES ($1, $2)")
                .bind(row.id)
                .bind(url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(row.into())
    }

    /// Delete a product; image rows cascade.
    ///
    /// The caller is responsible for removing the backing files afterwards
    /// (best-effort, outside the transaction).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List a product's images, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn images(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductImage>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductImageRow>(
            "SELECT id, product_id, image_url, created_at FROM product_image \
             WHERE product_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// The public URL paths of a product's images (collected before a
    /// cascade delete so the files can be removed afterwards).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn image_urls(&self, product_id: ProductId) -> Result<Vec<String>, RepositoryError> {
        let urls = sqlx::query_scalar::<_, String>(
            "SELECT image_url FROM product_image WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(urls)
    }

    /// Get a single image by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_image(
        &self,
        id: ProductImageId,
    ) -> Result<Option<ProductImage>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductImageRow>(
            "SELECT id, product_id, image_url, created_at FROM product_image WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a single image row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the image doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_image(&self, id: ProductImageId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product_image WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
