//! Product repository over `PostgreSQL`.
//!
//! Derived currency prices are computed here at write time from the fixed
//! rate table; reads return whatever was stored, even if rates were to
//! change later.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use shopapp_core::{CategoryId, ProductId, ShopId};

use super::RepositoryError;
use crate::models::{DerivedPrices, Product, ProductDraft};

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    price: Decimal,
    dollar_price: Decimal,
    peso_price: Decimal,
    yen_price: Decimal,
    shop_id: Option<i64>,
}

impl ProductRow {
    fn into_product(self, categories: Vec<CategoryId>) -> Product {
        Product {
            id: ProductId::new(self.id),
            price: self.price,
            derived_prices: DerivedPrices {
                dollar: self.dollar_price,
                peso: self.peso_price,
                yen: self.yen_price,
            },
            shop_id: self.shop_id.map(ShopId::new),
            categories,
        }
    }
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product, computing its derived currency prices.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    #[instrument(skip(self, draft), fields(price = %draft.price))]
    pub async fn insert(&self, draft: &ProductDraft) -> Result<ProductId, RepositoryError> {
        let derived = DerivedPrices::of(draft.price);
        let mut tx = self.pool.begin().await?;

        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO products (price, dollar_price, peso_price, yen_price, shop_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(draft.price)
        .bind(derived.dollar)
        .bind(derived.peso)
        .bind(derived.yen)
        .bind(draft.shop_id.map(|shop| shop.as_i64()))
        .fetch_one(&mut *tx)
        .await?;

        for category in &draft.categories {
            sqlx::query(
                "INSERT INTO products_categories (product_id, category_id) VALUES ($1, $2)",
            )
            .bind(id)
            .bind(category.as_i64())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(id, "Inserted product");
        Ok(ProductId::new(id))
    }

    /// Fetch one product with its category links.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn find(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT id, price, dollar_price, peso_price, yen_price, shop_id \
             FROM products WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut products = attach_categories(self.pool, vec![row]).await?;
        Ok(products.pop())
    }
}

/// Products owned by a shop, in id order. Used by the shop delete path.
pub(super) async fn fetch_by_shop(
    pool: &PgPool,
    shop_id: ShopId,
) -> Result<Vec<Product>, RepositoryError> {
    let rows: Vec<ProductRow> = sqlx::query_as(
        "SELECT id, price, dollar_price, peso_price, yen_price, shop_id \
         FROM products WHERE shop_id = $1 ORDER BY id ASC",
    )
    .bind(shop_id.as_i64())
    .fetch_all(pool)
    .await?;
    attach_categories(pool, rows).await
}

async fn attach_categories(
    pool: &PgPool,
    rows: Vec<ProductRow>,
) -> Result<Vec<Product>, RepositoryError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let links: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT product_id, category_id FROM products_categories \
         WHERE product_id = ANY($1) ORDER BY category_id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_product: HashMap<i64, Vec<CategoryId>> = HashMap::new();
    for (product_id, category_id) in links {
        by_product
            .entry(product_id)
            .or_default()
            .push(CategoryId::new(category_id));
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let categories = by_product.remove(&row.id).unwrap_or_default();
            row.into_product(categories)
        })
        .collect())
}
