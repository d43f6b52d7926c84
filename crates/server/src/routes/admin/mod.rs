//! Admin route handlers, gated by the `RequireAdmin` extractor.

pub mod auth;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the admin routes router (nested under `/admin`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::dashboard))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/produtos", get(products::index))
        .route(
            "/produtos/novo",
            get(products::new_form).post(products::create),
        )
        .route(
            "/produtos/{id}/editar",
            get(products::edit_form).post(products::update),
        )
        .route("/produtos/{id}/excluir", post(products::delete))
        .route("/produtos/imagem/{id}/excluir", post(products::delete_image))
        .route("/pedidos/{id}/status", post(orders::update_status))
}
