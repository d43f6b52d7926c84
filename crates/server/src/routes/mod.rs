//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Storefront
//! GET  /                         - Catalog listing (optional ?q= search)
//! GET  /produto/{id}             - Product detail
//! GET  /carrinho                 - Cart page
//! POST /carrinho/add/{id}        - Add product to cart (form field `qty`)
//! POST /carrinho/update          - Bulk quantity update (fields `qty_{id}`)
//! GET  /carrinho/limpar          - Empty the cart
//! GET  /checkout                 - Checkout page
//! POST /pedido/criar             - Create order
//! GET  /pedido/{id}/sucesso      - Order confirmation + hand-off message
//!
//! # Admin (session-authenticated)
//! GET  /admin                    - Dashboard with recent orders
//! GET  /admin/login              - Login page
//! POST /admin/login              - Login action
//! GET  /admin/logout             - Logout action
//! GET  /admin/produtos           - Product list
//! GET  /admin/produtos/novo      - New product form
//! POST /admin/produtos/novo      - Create product (multipart)
//! GET  /admin/produtos/{id}/editar  - Edit product form
//! POST /admin/produtos/{id}/editar  - Update product (multipart)
//! POST /admin/produtos/{id}/excluir - Delete product (cascades images)
//! POST /admin/produtos/imagem/{id}/excluir - Delete one image
//! POST /admin/pedidos/{id}/status   - Update order status
//! ```

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::models::CartStore;
use crate::state::AppState;

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(catalog::index))
        .route("/produto/{id}", get(catalog::show))
        // Cart
        .route("/carrinho", get(cart::show))
        .route("/carrinho/add/{id}", post(cart::add))
        .route("/carrinho/update", post(cart::update))
        .route("/carrinho/limpar", get(cart::clear))
        // Checkout
        .route("/checkout", get(checkout::show))
        .route("/pedido/criar", post(checkout::create))
        .route("/pedido/{id}/sucesso", get(checkout::success))
        // Admin
        .nest("/admin", admin::routes())
}

/// Total cart quantity for the navbar badge.
pub(crate) async fn cart_count(session: &Session) -> u32 {
    CartStore::new(session).load().await.item_count()
}
