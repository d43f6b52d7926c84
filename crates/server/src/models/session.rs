//! Session keys and the session-backed cart store.

use tower_sessions::Session;

use atelie_core::Cart;

/// Keys used to store data in the session.
///
/// Centralized here to avoid typos and make it easy to see what's stored.
pub mod session_keys {
    /// The visitor's cart (`Cart`, product-id-as-string to quantity).
    pub const CART: &str = "cart";
    /// ID of the authenticated admin (`UserId`).
    pub const ADMIN_USER_ID: &str = "admin_user_id";
}

/// Session-backed storage for the visitor cart.
///
/// Callers load a [`Cart`], mutate it, and save it back; the backing store
/// (currently the tower-sessions Postgres store) is an implementation detail
/// behind this interface.
pub struct CartStore<'a> {
    session: &'a Session,
}

impl<'a> CartStore<'a> {
    /// Wrap the request session.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Load the visitor's cart, empty when absent or undecodable.
    pub async fn load(&self) -> Cart {
        self.session
            .get::<Cart>(session_keys::CART)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Persist the cart back into the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save(&self, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(session_keys::CART, cart).await
    }

    /// Replace the cart with an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn clear(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(session_keys::CART, Cart::new()).await
    }
}
