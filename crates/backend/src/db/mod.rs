//! `PostgreSQL` store: pool construction, the store seam and query intents.
//!
//! # Tables
//!
//! - `shops` - shop records (`nb_products` is derived on read)
//! - `opening_hours` - one row per weekly slot, owned by a shop
//! - `products` - products with write-time derived currency prices
//! - `categories`, `products_categories` - category links
//!
//! # Migrations
//!
//! Plain SQL files under `crates/backend/migrations/`, applied by the host
//! with `sqlx::migrate!` or any migration runner.

use std::time::Duration;

use chrono::NaiveDate;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shopapp_core::{Page, Pageable, ProductId, ShopId};

use crate::models::{Product, Shop, ShopDraft};

pub mod products;
pub mod shops;

pub use products::ProductRepository;
pub use shops::ShopRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Orderings a sorted listing can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopSort {
    /// Shop name, ascending.
    Name,
    /// Creation date, ascending.
    CreatedAt,
    /// Owned-product count, ascending.
    ProductCount,
}

impl ShopSort {
    /// Map a caller-supplied sort key onto an ordering.
    ///
    /// Unknown keys fall through to product-count ordering.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        match key {
            "name" => Self::Name,
            "createdAt" => Self::CreatedAt,
            _ => Self::ProductCount,
        }
    }
}

/// Filter combination for an unsorted listing.
///
/// One variant per presence combination of the three optional filters, most
/// specific first. Date comparisons are strict on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopFilter {
    VacationsCreatedBetween {
        in_vacations: bool,
        after: NaiveDate,
        before: NaiveDate,
    },
    VacationsCreatedBefore {
        in_vacations: bool,
        before: NaiveDate,
    },
    VacationsCreatedAfter {
        in_vacations: bool,
        after: NaiveDate,
    },
    Vacations {
        in_vacations: bool,
    },
    CreatedBetween {
        after: NaiveDate,
        before: NaiveDate,
    },
    CreatedBefore {
        before: NaiveDate,
    },
    CreatedAfter {
        after: NaiveDate,
    },
}

/// The query a listing request resolves to, built once from the optional
/// parameters and matched exhaustively by store implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListQuery {
    /// Explicit ordering requested; all filters are ignored.
    SortedBy(ShopSort),
    /// No ordering requested; at least one filter present.
    Filtered(ShopFilter),
    /// No ordering, no filters: everything, by id ascending.
    ByIdAsc,
}

impl ListQuery {
    /// Resolve the optional listing parameters into one query intent.
    ///
    /// Precedence: a sort key wins outright, then the most specific filter
    /// combination, then the plain id-ordered listing.
    #[must_use]
    pub fn from_params(
        sort_by: Option<&str>,
        in_vacations: Option<bool>,
        created_before: Option<NaiveDate>,
        created_after: Option<NaiveDate>,
    ) -> Self {
        if let Some(key) = sort_by {
            return Self::SortedBy(ShopSort::parse(key));
        }

        match (in_vacations, created_before, created_after) {
            (Some(in_vacations), Some(before), Some(after)) => {
                Self::Filtered(ShopFilter::VacationsCreatedBetween {
                    in_vacations,
                    after,
                    before,
                })
            }
            (Some(in_vacations), Some(before), None) => {
                Self::Filtered(ShopFilter::VacationsCreatedBefore {
                    in_vacations,
                    before,
                })
            }
            (Some(in_vacations), None, Some(after)) => {
                Self::Filtered(ShopFilter::VacationsCreatedAfter {
                    in_vacations,
                    after,
                })
            }
            (Some(in_vacations), None, None) => {
                Self::Filtered(ShopFilter::Vacations { in_vacations })
            }
            (None, Some(before), Some(after)) => {
                Self::Filtered(ShopFilter::CreatedBetween { after, before })
            }
            (None, Some(before), None) => Self::Filtered(ShopFilter::CreatedBefore { before }),
            (None, None, Some(after)) => Self::Filtered(ShopFilter::CreatedAfter { after }),
            (None, None, None) => Self::ByIdAsc,
        }
    }
}

/// Store operations the shop service depends on.
///
/// Implemented by [`ShopRepository`] over `PostgreSQL`; tests substitute an
/// in-memory implementation.
#[allow(async_fn_in_trait)]
pub trait ShopStore {
    /// Fetch one shop with its opening hours and derived product count.
    async fn find_shop(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError>;

    /// Insert a new shop and its opening hours, returning the generated id.
    async fn insert_shop(&self, draft: &ShopDraft) -> Result<ShopId, RepositoryError>;

    /// Full-replace an existing shop, including its opening hours.
    async fn replace_shop(&self, id: ShopId, draft: &ShopDraft) -> Result<(), RepositoryError>;

    /// Delete a shop row. Owned products must be detached first.
    async fn delete_shop(&self, id: ShopId) -> Result<(), RepositoryError>;

    /// Products currently owned by a shop, in id order.
    async fn products_of_shop(&self, id: ShopId) -> Result<Vec<Product>, RepositoryError>;

    /// Null one product's shop reference.
    async fn detach_product(&self, id: ProductId) -> Result<(), RepositoryError>;

    /// Run one listing query with totals.
    async fn list_shops(
        &self,
        query: &ListQuery,
        pageable: Pageable,
    ) -> Result<Page<Shop>, RepositoryError>;

    /// Fetch shops by id, preserving the order of `ids`. Unknown ids are
    /// silently skipped.
    async fn shops_by_ids(&self, ids: &[ShopId]) -> Result<Vec<Shop>, RepositoryError>;

    /// Every shop, for index bootstrap.
    async fn all_shops(&self) -> Result<Vec<Shop>, RepositoryError>;
}
