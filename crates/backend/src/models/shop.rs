//! Shop records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shopapp_core::{OpeningHours, ShopId};

/// A persisted shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    /// Primary key.
    pub id: ShopId,
    /// Display name; also the full-text-indexed field.
    pub name: String,
    /// Date the record was first persisted (set by the store).
    pub created_at: NaiveDate,
    /// Whether the shop is currently closed for vacations.
    pub in_vacations: bool,
    /// Weekly opening-hours slots. Never overlapping per the create/update gate.
    pub opening_hours: Vec<OpeningHours>,
    /// Number of products owned by the shop.
    ///
    /// Derived by the store on read; this is why create/update re-read the
    /// record after writing instead of returning the draft.
    pub nb_products: i64,
}

/// Caller-supplied shop fields for create and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopDraft {
    /// Display name.
    pub name: String,
    /// Vacation flag.
    pub in_vacations: bool,
    /// Weekly opening-hours slots, validated for overlap before any write.
    pub opening_hours: Vec<OpeningHours>,
}
