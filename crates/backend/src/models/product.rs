//! Product and category records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopapp_core::{CategoryId, Currency, ProductId, ShopId};

/// Foreign-currency prices derived from the euro base price.
///
/// Computed once at write time from the fixed rate table; not refreshed when
/// rates would change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedPrices {
    pub dollar: Decimal,
    pub peso: Decimal,
    pub yen: Decimal,
}

impl DerivedPrices {
    /// Derive all foreign-currency prices from a euro amount.
    #[must_use]
    pub fn of(price: Decimal) -> Self {
        Self {
            dollar: Currency::Dollar.convert(price),
            peso: Currency::Peso.convert(price),
            yen: Currency::Yen.convert(price),
        }
    }
}

/// A persisted product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Primary key.
    pub id: ProductId,
    /// Base price in euros.
    pub price: Decimal,
    /// Write-time derived foreign-currency prices.
    pub derived_prices: DerivedPrices,
    /// Owning shop, if any. Nulled (not cascaded) when the shop is deleted.
    pub shop_id: Option<ShopId>,
    /// Linked category ids.
    pub categories: Vec<CategoryId>,
}

/// Caller-supplied product fields; derived prices are computed on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Base price in euros.
    pub price: Decimal,
    /// Owning shop, if any.
    pub shop_id: Option<ShopId>,
    /// Linked category ids.
    pub categories: Vec<CategoryId>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Primary key.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
}
