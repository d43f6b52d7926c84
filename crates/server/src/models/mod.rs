//! Domain models for the storefront and admin surfaces.
//!
//! These are validated domain objects, separate from the database row types
//! that live next to the queries in [`crate::db`].

pub mod catalog;
pub mod order;
pub mod session;
pub mod user;

pub use catalog::{Product, ProductImage};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
pub use session::{CartStore, session_keys};
pub use user::User;
