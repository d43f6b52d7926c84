//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Format a money value as Brazilian currency, e.g. `R$ 120,00`.
#[must_use]
pub fn format_brl(value: impl Display) -> String {
    format!("R$ {}", format!("{value:.2}").replace('.', ","))
}

/// Format a money value for display.
///
/// Usage in templates: `{{ product.price|money }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_brl(value))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn formats_with_comma_decimal_separator() {
        let price: Decimal = "120.00".parse().expect("decimal");
        assert_eq!(format_brl(price), "R$ 120,00");
    }

    #[test]
    fn pads_to_two_decimal_places() {
        assert_eq!(format_brl(Decimal::from(7)), "R$ 7,00");
        let half: Decimal = "0.5".parse().expect("decimal");
        assert_eq!(format_brl(half), "R$ 0,50");
    }
}
