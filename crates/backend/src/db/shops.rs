//! Shop repository over `PostgreSQL`.
//!
//! All queries use runtime binding (no compile-time macros) so the crate
//! builds without a live database. `nb_products` is derived with a subquery
//! on every read, which is why the service re-reads a shop after writing it.

use std::collections::HashMap;

use chrono::{NaiveTime, Weekday};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, instrument};

use shopapp_core::{OpeningHours, Page, Pageable, ProductId, ShopId};

use super::{ListQuery, RepositoryError, ShopFilter, ShopSort, ShopStore, products};
use crate::models::{Product, Shop, ShopDraft};

const SELECT_SHOPS: &str = "\
SELECT s.id, s.name, s.created_at, s.in_vacations, \
       (SELECT COUNT(*) FROM products p WHERE p.shop_id = s.id) AS nb_products \
FROM shops s";

const COUNT_SHOPS: &str = "SELECT COUNT(*) FROM shops s";

/// Repository for shop database operations.
pub struct ShopRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct ShopRow {
    id: i64,
    name: String,
    created_at: chrono::NaiveDate,
    in_vacations: bool,
    nb_products: i64,
}

#[derive(sqlx::FromRow)]
struct HoursRow {
    shop_id: i64,
    day: i16,
    open_at: NaiveTime,
    close_at: NaiveTime,
}

impl HoursRow {
    fn decode(self) -> Result<(i64, OpeningHours), RepositoryError> {
        let day = u8::try_from(self.day)
            .ok()
            .and_then(|d| Weekday::try_from(d).ok())
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!("invalid day index {}", self.day))
            })?;
        Ok((
            self.shop_id,
            OpeningHours::new(day, self.open_at, self.close_at),
        ))
    }
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Attach opening-hours slots to a batch of shop rows, preserving row order.
    async fn hydrate(&self, rows: Vec<ShopRow>) -> Result<Vec<Shop>, RepositoryError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let hours_rows: Vec<HoursRow> = sqlx::query_as(
            "SELECT shop_id, day, open_at, close_at FROM opening_hours \
             WHERE shop_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_shop: HashMap<i64, Vec<OpeningHours>> = HashMap::new();
        for row in hours_rows {
            let (shop_id, slot) = row.decode()?;
            by_shop.entry(shop_id).or_default().push(slot);
        }

        Ok(rows
            .into_iter()
            .map(|row| Shop {
                id: ShopId::new(row.id),
                name: row.name,
                created_at: row.created_at,
                in_vacations: row.in_vacations,
                opening_hours: by_shop.remove(&row.id).unwrap_or_default(),
                nb_products: row.nb_products,
            })
            .collect())
    }
}

/// Append the WHERE clause of one filter combination.
///
/// Shared between the page query and its count query so both always agree.
/// Date comparisons are strict on both ends.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ShopFilter) {
    match *filter {
        ShopFilter::VacationsCreatedBetween {
            in_vacations,
            after,
            before,
        } => {
            builder
                .push(" WHERE s.in_vacations = ")
                .push_bind(in_vacations)
                .push(" AND s.created_at > ")
                .push_bind(after)
                .push(" AND s.created_at < ")
                .push_bind(before);
        }
        ShopFilter::VacationsCreatedBefore {
            in_vacations,
            before,
        } => {
            builder
                .push(" WHERE s.in_vacations = ")
                .push_bind(in_vacations)
                .push(" AND s.created_at < ")
                .push_bind(before);
        }
        ShopFilter::VacationsCreatedAfter {
            in_vacations,
            after,
        } => {
            builder
                .push(" WHERE s.in_vacations = ")
                .push_bind(in_vacations)
                .push(" AND s.created_at > ")
                .push_bind(after);
        }
        ShopFilter::Vacations { in_vacations } => {
            builder
                .push(" WHERE s.in_vacations = ")
                .push_bind(in_vacations);
        }
        ShopFilter::CreatedBetween { after, before } => {
            builder
                .push(" WHERE s.created_at > ")
                .push_bind(after)
                .push(" AND s.created_at < ")
                .push_bind(before);
        }
        ShopFilter::CreatedBefore { before } => {
            builder.push(" WHERE s.created_at < ").push_bind(before);
        }
        ShopFilter::CreatedAfter { after } => {
            builder.push(" WHERE s.created_at > ").push_bind(after);
        }
    }
}

const fn order_clause(query: &ListQuery) -> &'static str {
    match query {
        ListQuery::SortedBy(ShopSort::Name) => " ORDER BY s.name ASC",
        ListQuery::SortedBy(ShopSort::CreatedAt) => " ORDER BY s.created_at ASC",
        ListQuery::SortedBy(ShopSort::ProductCount) => " ORDER BY nb_products ASC",
        // Filtered and unfiltered listings use the stable id order.
        ListQuery::Filtered(_) | ListQuery::ByIdAsc => " ORDER BY s.id ASC",
    }
}

impl ShopStore for ShopRepository<'_> {
    #[instrument(skip(self))]
    async fn find_shop(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError> {
        let row: Option<ShopRow> =
            sqlx::query_as(&format!("{SELECT_SHOPS} WHERE s.id = $1"))
                .bind(id.as_i64())
                .fetch_optional(self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut shops = self.hydrate(vec![row]).await?;
        Ok(shops.pop())
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn insert_shop(&self, draft: &ShopDraft) -> Result<ShopId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO shops (name, created_at, in_vacations) \
             VALUES ($1, CURRENT_DATE, $2) RETURNING id",
        )
        .bind(&draft.name)
        .bind(draft.in_vacations)
        .fetch_one(&mut *tx)
        .await?;

        insert_hours(&mut tx, id, &draft.opening_hours).await?;
        tx.commit().await?;

        debug!(id, "Inserted shop");
        Ok(ShopId::new(id))
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn replace_shop(&self, id: ShopId, draft: &ShopDraft) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE shops SET name = $1, in_vacations = $2 WHERE id = $3")
            .bind(&draft.name)
            .bind(draft.in_vacations)
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        // Full-replace semantics: the slot list is rewritten wholesale.
        sqlx::query("DELETE FROM opening_hours WHERE shop_id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;
        insert_hours(&mut tx, id.as_i64(), &draft.opening_hours).await?;

        tx.commit().await?;
        debug!(%id, "Replaced shop");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_shop(&self, id: ShopId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shops WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        debug!(%id, "Deleted shop");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn products_of_shop(&self, id: ShopId) -> Result<Vec<Product>, RepositoryError> {
        products::fetch_by_shop(self.pool, id).await
    }

    #[instrument(skip(self))]
    async fn detach_product(&self, id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE products SET shop_id = NULL WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;
        debug!(%id, "Detached product from its shop");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_shops(
        &self,
        query: &ListQuery,
        pageable: Pageable,
    ) -> Result<Page<Shop>, RepositoryError> {
        let mut count_builder = QueryBuilder::new(COUNT_SHOPS);
        if let ListQuery::Filtered(filter) = query {
            push_filter(&mut count_builder, filter);
        }
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        let mut page_builder = QueryBuilder::new(SELECT_SHOPS);
        if let ListQuery::Filtered(filter) = query {
            push_filter(&mut page_builder, filter);
        }
        page_builder
            .push(order_clause(query))
            .push(" LIMIT ")
            .push_bind(i64::from(pageable.size))
            .push(" OFFSET ")
            .push_bind(i64::try_from(pageable.offset()).unwrap_or(i64::MAX));

        let rows: Vec<ShopRow> = page_builder
            .build_query_as()
            .fetch_all(self.pool)
            .await?;
        let shops = self.hydrate(rows).await?;

        debug!(total, returned = shops.len(), "Listed shops");
        Ok(Page::new(shops, pageable, total.unsigned_abs()))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn shops_by_ids(&self, ids: &[ShopId]) -> Result<Vec<Shop>, RepositoryError> {
        let raw_ids: Vec<i64> = ids.iter().map(|id| id.as_i64()).collect();
        let rows: Vec<ShopRow> =
            sqlx::query_as(&format!("{SELECT_SHOPS} WHERE s.id = ANY($1)"))
                .bind(&raw_ids)
                .fetch_all(self.pool)
                .await?;
        let shops = self.hydrate(rows).await?;

        // Restore the caller's (hit) order.
        let mut by_id: HashMap<ShopId, Shop> =
            shops.into_iter().map(|s| (s.id, s)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    #[instrument(skip(self))]
    async fn all_shops(&self) -> Result<Vec<Shop>, RepositoryError> {
        let rows: Vec<ShopRow> =
            sqlx::query_as(&format!("{SELECT_SHOPS} ORDER BY s.id ASC"))
                .fetch_all(self.pool)
                .await?;
        self.hydrate(rows).await
    }
}

async fn insert_hours(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    shop_id: i64,
    hours: &[OpeningHours],
) -> Result<(), RepositoryError> {
    for slot in hours {
        sqlx::query(
            "INSERT INTO opening_hours (shop_id, day, open_at, close_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(shop_id)
        .bind(i16::try_from(slot.day.num_days_from_monday()).unwrap_or_default())
        .bind(slot.open_at)
        .bind(slot.close_at)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
