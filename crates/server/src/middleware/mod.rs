//! Middleware: session layer and admin auth extractor.

pub mod auth;
pub mod session;

pub use auth::{RequireAdmin, is_admin, sign_in_admin, sign_out_admin};
pub use session::create_session_layer;
