use std::fmt::Display;

use bon::Builder;

/// A monetary amount paired with its ISO currency short code.
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Price {
    /// The amount in major units of the currency.
    pub amount: f64,
    /// ISO short code, e.g. "EUR".
    #[builder(into)]
    pub currency: String,
}

impl Price {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Price {
            amount,
            currency: currency.into(),
        }
    }

    /// The amount as the gateway expects it on the wire: exactly two decimal
    /// places.
    pub fn wire_amount(&self) -> String {
        format!("{:.2}", self.amount)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.wire_amount(), self.currency)
    }
}
