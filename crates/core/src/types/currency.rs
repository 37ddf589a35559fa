//! Fixed currency table used for derived product prices.
//!
//! Conversion rates are static: derived prices are computed from them at
//! write time, not refreshed from any external rate source.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currencies a product price can be expressed in.
///
/// [`Currency::Euro`] is the base currency; every rate converts from euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Euro,
    Dollar,
    Peso,
    Yen,
}

impl Currency {
    /// Human-readable currency name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Euro => "Euro",
            Self::Dollar => "Dollar",
            Self::Peso => "Peso",
            Self::Yen => "Yen",
        }
    }

    /// Conversion rate from the euro base price.
    #[must_use]
    pub fn conversion_rate(self) -> Decimal {
        match self {
            Self::Euro => Decimal::new(100, 2),
            Self::Dollar => Decimal::new(109, 2),
            Self::Peso => Decimal::new(1869, 2),
            Self::Yen => Decimal::new(16069, 2),
        }
    }

    /// Convert a euro amount into this currency.
    #[must_use]
    pub fn convert(self, euros: Decimal) -> Decimal {
        euros * self.conversion_rate()
    }
}
