//! Payment method enum.

use core::fmt;

use serde::{Deserialize, Serialize};

/// How the customer intends to pay.
///
/// Settlement happens off-system; this only selects the instructions shown
/// to the customer and whether the configured pix discount applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Instant transfer via pix key. Eligible for the configured discount.
    #[default]
    Pix,
    /// Card via the external payment link.
    Card,
}

impl PaymentMethod {
    /// Parse a wire value (`"pix"` or `"card"`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pix" => Some(Self::Pix),
            "card" => Some(Self::Card),
            _ => None,
        }
    }

    /// Parse a form value, falling back to [`PaymentMethod::Pix`] when the
    /// value is absent or not one of the two known methods.
    #[must_use]
    pub fn from_form(s: Option<&str>) -> Self {
        s.and_then(Self::parse).unwrap_or_default()
    }

    /// The wire value stored in the database and submitted by forms.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pix => "pix",
            Self::Card => "card",
        }
    }

    /// Human-readable label for templates and the hand-off message.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pix => "Pix",
            Self::Card => "Cartão",
        }
    }

    /// Whether the configured percentage discount applies to this method.
    #[must_use]
    pub const fn discount_eligible(self) -> bool {
        matches!(self, Self::Pix)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_methods() {
        assert_eq!(PaymentMethod::parse("pix"), Some(PaymentMethod::Pix));
        assert_eq!(PaymentMethod::parse("card"), Some(PaymentMethod::Card));
        assert_eq!(PaymentMethod::parse("boleto"), None);
    }

    #[test]
    fn form_value_defaults_to_pix() {
        assert_eq!(PaymentMethod::from_form(None), PaymentMethod::Pix);
        assert_eq!(PaymentMethod::from_form(Some("card")), PaymentMethod::Card);
        assert_eq!(PaymentMethod::from_form(Some("cheque")), PaymentMethod::Pix);
    }

    #[test]
    fn only_pix_is_discount_eligible() {
        assert!(PaymentMethod::Pix.discount_eligible());
        assert!(!PaymentMethod::Card.discount_eligible());
    }
}
