//! Admin dashboard and order status management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use atelie_core::OrderId;

use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::Order;
use crate::state::AppState;

/// How many recent orders the dashboard shows.
const DASHBOARD_ORDER_LIMIT: i64 = 80;

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: Option<String>,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub store_name: String,
    pub orders: Vec<Order>,
}

/// Dashboard: the most recent orders with an inline status form.
#[instrument(skip(_admin, state))]
pub async fn dashboard(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<DashboardTemplate> {
    let orders = OrderRepository::new(state.pool())
        .recent(DASHBOARD_ORDER_LIMIT)
        .await?;

    Ok(DashboardTemplate {
        store_name: state.store().name.clone(),
        orders,
    })
}

/// Overwrite an order's free-text status. A blank status is a no-op.
#[instrument(skip(_admin, state, form))]
pub async fn update_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let status = form.status.unwrap_or_default().trim().to_string();

    if !status.is_empty() {
        OrderRepository::new(state.pool())
            .update_status(OrderId::new(id), &status)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AppError::NotFound(format!("order {id}")),
                other => other.into(),
            })?;
    }

    Ok(Redirect::to("/admin"))
}
