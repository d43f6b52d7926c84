//! Admin login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{RequireAdmin, is_admin, sign_in_admin, sign_out_admin};
use crate::services::AuthService;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub store_name: String,
    pub error: Option<String>,
}

/// Display the login page; an already-authenticated admin is sent to the
/// dashboard.
#[instrument(skip(state, session))]
pub async fn login_page(State(state): State<AppState>, session: Session) -> Response {
    if is_admin(&session).await {
        return Redirect::to("/admin").into_response();
    }

    LoginTemplate {
        store_name: state.store().name.clone(),
        error: None,
    }
    .into_response()
}

/// Verify credentials and mark the session as an admin.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            sign_in_admin(&session, user.id).await?;
            Ok(Redirect::to("/admin").into_response())
        }
        Err(AuthError::Repository(err)) => Err(err.into()),
        Err(_) => Ok(LoginTemplate {
            store_name: state.store().name.clone(),
            error: Some("Login inválido.".to_string()),
        }
        .into_response()),
    }
}

/// Log the admin out and return to the storefront.
#[instrument(skip(_admin, session))]
pub async fn logout(_admin: RequireAdmin, session: Session) -> Result<Redirect> {
    sign_out_admin(&session).await?;
    Ok(Redirect::to("/"))
}
