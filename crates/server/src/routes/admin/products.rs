//! Admin catalog management: product CRUD and image uploads.
//!
//! Create and update submit a multipart form (text fields plus any number
//! of `image_files`). Files with an unsupported extension are skipped with
//! a warning; the rest of the batch still goes through. Image files are
//! stored before the database transaction that references them, so a crash
//! in between can leave an orphan file - accepted, no cleanup job.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use tracing::instrument;

use atelie_core::{ProductId, ProductImageId, pricing};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{Product, ProductImage};
use crate::services::uploads;
use crate::state::AppState;

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct ProductsTemplate {
    pub store_name: String,
    pub products: Vec<Product>,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/product_form.html")]
pub struct ProductFormTemplate {
    pub store_name: String,
    pub form_action: String,
    pub product: Option<Product>,
    pub images: Vec<ProductImage>,
    pub error: Option<String>,
}

/// Parsed multipart product form.
#[derive(Debug, Default)]
struct ProductForm {
    name: String,
    description: String,
    price: String,
    is_active: bool,
    files: Vec<UploadedFile>,
}

/// One file from the `image_files` multipart field.
#[derive(Debug)]
struct UploadedFile {
    filename: String,
    data: Bytes,
}

/// Read the multipart product form into memory.
async fn read_product_form(multipart: &mut Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => {
                form.name = read_text(field).await?.trim().to_string();
            }
            "description" => {
                form.description = read_text(field).await?.trim().to_string();
            }
            "price" => {
                form.price = read_text(field).await?;
            }
            "is_active" => {
                let value = read_text(field).await?;
                form.is_active = value == "on" || value == "true";
            }
            "image_files" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if filename.is_empty() {
                    continue;
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid upload: {e}")))?;
                form.files.push(UploadedFile { filename, data });
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("invalid form: {e}")))
}

/// Parse a price accepting comma or dot as decimal separator. An empty
/// value means zero; negative values are rejected.
fn parse_price(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    let normalized = if raw.is_empty() {
        "0".to_string()
    } else {
        raw.replace(',', ".")
    };

    let price = normalized.parse::<Decimal>().ok()?;
    (price >= Decimal::ZERO).then(|| pricing::round_money(price))
}

/// Store the accepted upload files and return their public URLs. Files
/// failing the extension allow-list are skipped with a warning.
async fn store_uploads(state: &AppState, files: Vec<UploadedFile>) -> Result<Vec<String>> {
    let mut urls = Vec::new();

    for file in files {
        if !uploads::allowed_file(&file.filename) {
            tracing::warn!(
                filename = %file.filename,
                "skipping image with unsupported extension"
            );
            continue;
        }

        let url = state
            .uploads()
            .save(&file.filename, &file.data)
            .await
            .map_err(|e| AppError::Internal(format!("failed to store upload: {e}")))?;
        urls.push(url);
    }

    Ok(urls)
}

/// Product list for the admin.
#[instrument(skip(_admin, state))]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<ProductsTemplate> {
    let products = ProductRepository::new(state.pool()).list_all().await?;

    Ok(ProductsTemplate {
        store_name: state.store().name.clone(),
        products,
    })
}

/// Empty product form.
#[instrument(skip(_admin, state))]
pub async fn new_form(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> ProductFormTemplate {
    ProductFormTemplate {
        store_name: state.store().name.clone(),
        form_action: "/admin/produtos/novo".to_string(),
        product: None,
        images: Vec::new(),
        error: None,
    }
}

/// Create a product from the multipart form.
#[instrument(skip(_admin, state, multipart))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let form = read_product_form(&mut multipart).await?;

    let form_error = |error: String| ProductFormTemplate {
        store_name: state.store().name.clone(),
        form_action: "/admin/produtos/novo".to_string(),
        product: None,
        images: Vec::new(),
        error: Some(error),
    };

    let Some(price) = parse_price(&form.price) else {
        return Ok(form_error("Preço inválido.".to_string()).into_response());
    };
    if form.name.is_empty() {
        return Ok(form_error("Informe o nome.".to_string()).into_response());
    }

    let image_urls = store_uploads(&state, form.files).await?;
    ProductRepository::new(state.pool())
        .create(
            &form.name,
            &form.description,
            price,
            form.is_active,
            &image_urls,
        )
        .await?;

    Ok(Redirect::to("/admin/produtos").into_response())
}

/// Edit form for an existing product.
#[instrument(skip(_admin, state))]
pub async fn edit_form(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ProductFormTemplate> {
    let products = ProductRepository::new(state.pool());

    let product = products
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let images = products.images(product.id).await?;

    Ok(ProductFormTemplate {
        store_name: state.store().name.clone(),
        form_action: format!("/admin/produtos/{id}/editar"),
        product: Some(product),
        images,
        error: None,
    })
}

/// Update a product from the multipart form.
#[instrument(skip(_admin, state, multipart))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Response> {
    let products = ProductRepository::new(state.pool());
    let product_id = ProductId::new(id);

    let product = products
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let form = read_product_form(&mut multipart).await?;

    let render_error = |images: Vec<ProductImage>, message: &str| {
        ProductFormTemplate {
            store_name: state.store().name.clone(),
            form_action: format!("/admin/produtos/{id}/editar"),
            product: Some(product.clone()),
            images,
            error: Some(message.to_string()),
        }
        .into_response()
    };

    let Some(price) = parse_price(&form.price) else {
        let images = products.images(product_id).await?;
        return Ok(render_error(images, "Preço inválido."));
    };
    if form.name.is_empty() {
        let images = products.images(product_id).await?;
        return Ok(render_error(images, "Informe o nome."));
    }

    let image_urls = store_uploads(&state, form.files).await?;
    products
        .update(
            product_id,
            &form.name,
            &form.description,
            price,
            form.is_active,
            &image_urls,
        )
        .await?;

    Ok(Redirect::to(&format!("/admin/produtos/{id}/editar")).into_response())
}

/// Delete a product; image rows cascade and the backing files are removed
/// best-effort afterwards.
#[instrument(skip(_admin, state))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let products = ProductRepository::new(state.pool());
    let product_id = ProductId::new(id);

    let image_urls = products.image_urls(product_id).await?;
    products.delete(product_id).await.map_err(|e| match e {
        crate::db::RepositoryError::NotFound => AppError::NotFound(format!("product {id}")),
        other => other.into(),
    })?;

    // Row deletion is committed; file removal failures only leave orphans.
    for url in &image_urls {
        state.uploads().remove(url).await;
    }

    Ok(Redirect::to("/admin/produtos"))
}

/// Delete a single product image: row first, then the file best-effort.
#[instrument(skip(_admin, state))]
pub async fn delete_image(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let products = ProductRepository::new(state.pool());

    let image = products
        .get_image(ProductImageId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("image {id}")))?;

    products.delete_image(image.id).await?;
    state.uploads().remove(&image.image_url).await;

    Ok(Redirect::to(&format!(
        "/admin/produtos/{}/editar",
        image.product_id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_accepts_comma_and_dot() {
        assert_eq!(parse_price("120.00"), Some(Decimal::new(120_00, 2)));
        assert_eq!(parse_price("120,50"), Some(Decimal::new(120_50, 2)));
        assert_eq!(parse_price(" 99,9 "), Some(Decimal::new(99_90, 2)));
    }

    #[test]
    fn empty_price_means_zero() {
        assert_eq!(parse_price(""), Some(Decimal::ZERO));
    }

    #[test]
    fn price_rejects_garbage_and_negatives() {
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price("-1.00"), None);
        assert_eq!(parse_price("12,34,56"), None);
    }

    #[test]
    fn price_rounds_to_the_cent() {
        assert_eq!(parse_price("1.005"), Some(Decimal::new(101, 2)));
    }
}
