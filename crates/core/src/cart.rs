//! The session-scoped visitor cart.
//!
//! A cart is a mapping from product-id-as-string to desired quantity. It is
//! serialized into the visitor's session by the server crate and never
//! persisted in the relational store. Product resolution (dropping lines
//! whose product vanished or went inactive) happens at view time, not here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Smallest quantity a line can hold.
pub const MIN_QTY: u32 = 1;
/// Largest quantity accepted from a single form submission.
pub const MAX_QTY: u32 = 99;

/// Per-visitor cart contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<String, u32>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `qty` of a product, accumulating onto any existing line.
    ///
    /// The incoming quantity is clamped to `[MIN_QTY, MAX_QTY]`; the
    /// accumulated line value is not re-clamped, so repeated adds can push a
    /// line past `MAX_QTY`.
    pub fn add(&mut self, product_id: ProductId, qty: u32) {
        let qty = clamp_qty(qty);
        *self.lines.entry(product_id.to_string()).or_insert(0) += qty;
    }

    /// Apply one entry of a bulk quantity update.
    ///
    /// A raw value that does not parse as a positive integer removes the
    /// line; otherwise the quantity is clamped to `[MIN_QTY, MAX_QTY]` and
    /// replaces the previous value.
    pub fn update_line(&mut self, product_id: &str, raw_qty: &str) {
        match raw_qty.trim().parse::<i64>() {
            Ok(qty) if qty > 0 => {
                let qty = u32::try_from(qty.min(i64::from(MAX_QTY))).unwrap_or(MAX_QTY);
                self.lines.insert(product_id.to_owned(), clamp_qty(qty));
            }
            _ => {
                self.lines.remove(product_id);
            }
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Whether the cart holds no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity across all lines, for the navbar badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.values().sum()
    }

    /// Iterate over `(product_id, qty)` lines in stable order.
    pub fn lines(&self) -> impl Iterator<Item = (&str, u32)> {
        self.lines.iter().map(|(id, qty)| (id.as_str(), *qty))
    }
}

/// Clamp a single-submission quantity to `[MIN_QTY, MAX_QTY]`.
#[must_use]
pub fn clamp_qty(qty: u32) -> u32 {
    qty.clamp(MIN_QTY, MAX_QTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_clamps_incoming_quantity() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 0);
        cart.add(ProductId::new(2), 150);

        let lines: Vec<_> = cart.lines().collect();
        assert_eq!(lines, vec![("1", 1), ("2", 99)]);
    }

    #[test]
    fn add_accumulates_onto_existing_line() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(7), 60);
        cart.add(ProductId::new(7), 60);

        // Accumulation is not re-clamped.
        assert_eq!(cart.lines().next(), Some(("7", 120)));
    }

    #[test]
    fn update_replaces_with_clamped_quantity() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(3), 5);

        cart.update_line("3", "150");
        assert_eq!(cart.lines().next(), Some(("3", 99)));

        cart.update_line("3", "2");
        assert_eq!(cart.lines().next(), Some(("3", 2)));
    }

    #[test]
    fn update_removes_on_zero_negative_or_garbage() {
        for raw in ["0", "-3", "abc", ""] {
            let mut cart = Cart::new();
            cart.add(ProductId::new(3), 5);
            cart.update_line("3", raw);
            assert!(cart.is_empty(), "raw {raw:?} should remove the line");
        }
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 2);
        cart.add(ProductId::new(2), 3);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn item_count_sums_quantities() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 2);
        cart.add(ProductId::new(2), 3);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn round_trips_through_serde() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 2);

        let json = serde_json::to_string(&cart).expect("serialize");
        assert_eq!(json, r#"{"1":2}"#);
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }
}
