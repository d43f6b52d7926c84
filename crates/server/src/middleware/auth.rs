//! Admin authentication extractor and session helpers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use atelie_core::UserId;

use crate::models::session_keys;

/// Extractor that requires an authenticated admin session.
///
/// If no admin is logged in, the request is redirected to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin_id): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, admin {admin_id}!")
/// }
/// ```
pub struct RequireAdmin(pub UserId);

/// Rejection for unauthenticated admin requests.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        Redirect::to("/admin/login").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(AuthRejection)?;

        let admin_id: UserId = session
            .get(session_keys::ADMIN_USER_ID)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        Ok(Self(admin_id))
    }
}

/// Whether the session belongs to a logged-in admin.
pub async fn is_admin(session: &Session) -> bool {
    session
        .get::<UserId>(session_keys::ADMIN_USER_ID)
        .await
        .ok()
        .flatten()
        .is_some()
}

/// Mark the session as an authenticated admin.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in_admin(
    session: &Session,
    admin_id: UserId,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ADMIN_USER_ID, admin_id).await
}

/// Clear the admin authentication from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_out_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<UserId>(session_keys::ADMIN_USER_ID)
        .await?;
    Ok(())
}
