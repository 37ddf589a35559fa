//! Shop service: lifecycle, filtered listing and full-text search merge.
//!
//! The service takes explicit store and index handles; it owns no state of
//! its own and is constructed per request.

use chrono::NaiveDate;
use tracing::{debug, instrument};

use shopapp_core::{Page, Pageable, ShopId, overlapping};

use crate::db::{ListQuery, ShopSort, ShopStore};
use crate::error::{AppError, Result};
use crate::models::{Shop, ShopDraft};
use crate::search::ShopIndex;

/// Optional parameters of the listing endpoint, as parsed by the host.
///
/// Dates arrive as ISO strings; parse failures surface as
/// [`AppError::InvalidDate`].
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Sort key; when present every filter below is ignored.
    pub sort_by: Option<String>,
    /// Vacation-flag filter.
    pub in_vacations: Option<bool>,
    /// Strict upper bound on the creation date (ISO format).
    pub created_before: Option<String>,
    /// Strict lower bound on the creation date (ISO format).
    pub created_after: Option<String>,
}

/// Optional filters of the search endpoint.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Vacation-flag filter.
    pub in_vacations: Option<bool>,
    /// Strict upper bound on the creation date (ISO format).
    pub created_before: Option<String>,
    /// Strict lower bound on the creation date (ISO format).
    pub created_after: Option<String>,
}

/// Service over shop records.
pub struct ShopService<'a, S> {
    store: &'a S,
    index: &'a ShopIndex,
}

impl<'a, S: ShopStore> ShopService<'a, S> {
    /// Create a new shop service.
    #[must_use]
    pub const fn new(store: &'a S, index: &'a ShopIndex) -> Self {
        Self { store, index }
    }

    /// Create a shop.
    ///
    /// Validates the opening hours before any write, persists the draft,
    /// then re-reads the record so store-derived fields (`created_at`,
    /// `nb_products`) are populated, and indexes the refreshed shop.
    ///
    /// # Errors
    ///
    /// `Validation` on overlapping opening hours; `Persistence` on store
    /// failures.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: &ShopDraft) -> Result<Shop> {
        if overlapping(&draft.opening_hours) {
            return Err(AppError::Validation(
                "overlapping opening hours".to_string(),
            ));
        }

        let id = self.store.insert_shop(draft).await?;
        let shop = self.refreshed(id).await?;
        self.index.index_shop(&shop)?;
        debug!(%id, "Created shop");
        Ok(shop)
    }

    /// Full-replace update of an existing shop.
    ///
    /// Requires the shop to exist, then follows the create path: opening
    /// hours are re-validated and replaced wholesale.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id; otherwise as [`Self::create`].
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn update(&self, id: ShopId, draft: &ShopDraft) -> Result<Shop> {
        self.require_shop(id).await?;

        if overlapping(&draft.opening_hours) {
            return Err(AppError::Validation(
                "overlapping opening hours".to_string(),
            ));
        }

        self.store.replace_shop(id, draft).await?;
        let shop = self.refreshed(id).await?;
        self.index.index_shop(&shop)?;
        debug!(%id, "Updated shop");
        Ok(shop)
    }

    /// Delete a shop.
    ///
    /// Every product still referencing the shop has its reference nulled
    /// first, one write per product in id order, so the shop row can be
    /// removed without violating referential integrity. The index entry is
    /// dropped last.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id; `Persistence` on store failures.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ShopId) -> Result<()> {
        let shop = self.require_shop(id).await?;

        let products = self.store.products_of_shop(shop.id).await?;
        for product in &products {
            self.store.detach_product(product.id).await?;
        }
        self.store.delete_shop(shop.id).await?;
        self.index.remove_shop(shop.id)?;

        debug!(%id, detached = products.len(), "Deleted shop");
        Ok(())
    }

    /// Fetch one shop.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: ShopId) -> Result<Shop> {
        self.require_shop(id).await
    }

    /// Paginated listing with optional sort key and filters.
    ///
    /// The optional parameters resolve to a single [`ListQuery`]: a sort key
    /// wins outright, then the most specific filter combination, then the
    /// plain id-ordered listing.
    ///
    /// # Errors
    ///
    /// `InvalidDate` if a filter date string does not parse (never on the
    /// sort branch); `Persistence` on store failures.
    #[instrument(skip(self, params))]
    pub async fn list(&self, params: &ListParams, pageable: Pageable) -> Result<Page<Shop>> {
        // A sort key ignores the filters entirely, so their date strings are
        // only parsed (and only able to fail) on the filter branch.
        let query = match params.sort_by.as_deref() {
            Some(key) => ListQuery::SortedBy(ShopSort::parse(key)),
            None => ListQuery::from_params(
                None,
                params.in_vacations,
                parse_date(params.created_before.as_deref())?,
                parse_date(params.created_after.as_deref())?,
            ),
        };
        debug!(?query, "Resolved listing query");
        Ok(self.store.list_shops(&query, pageable).await?)
    }

    /// Full-text search on shop names, merged with the listing filters.
    ///
    /// Fetches the complete hit set from the index, loads those shops in hit
    /// order, keeps the ones matching every present filter, and slices one
    /// page out of the result. The page total is the full filtered hit
    /// count.
    ///
    /// # Errors
    ///
    /// `InvalidDate` if a date string does not parse; `Search` if the index
    /// query fails; `Persistence` on store failures.
    #[instrument(skip(self, params))]
    pub async fn search_by_name(
        &self,
        name: &str,
        params: &SearchParams,
        pageable: Pageable,
    ) -> Result<Page<Shop>> {
        let created_before = parse_date(params.created_before.as_deref())?;
        let created_after = parse_date(params.created_after.as_deref())?;

        let ids = self.index.search_all(name)?;
        let hits = self.store.shops_by_ids(&ids).await?;
        let filtered: Vec<Shop> = hits
            .into_iter()
            .filter(|shop| {
                matches_filters(shop, params.in_vacations, created_before, created_after)
            })
            .collect();

        debug!(kept = filtered.len(), "Merged search hits with filters");
        Ok(Page::from_complete(filtered, pageable))
    }

    async fn require_shop(&self, id: ShopId) -> Result<Shop> {
        self.store
            .find_shop(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("shop with id {id} not found")))
    }

    /// Re-read a record after a write so derived fields are populated.
    async fn refreshed(&self, id: ShopId) -> Result<Shop> {
        self.store
            .find_shop(id)
            .await?
            .ok_or_else(|| AppError::Persistence(format!("shop {id} vanished after write")))
    }
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(str::parse::<NaiveDate>)
        .transpose()
        .map_err(AppError::from)
}

/// Conjunction of the present filters; strict date comparisons on both ends.
fn matches_filters(
    shop: &Shop,
    in_vacations: Option<bool>,
    created_before: Option<NaiveDate>,
    created_after: Option<NaiveDate>,
) -> bool {
    if let Some(flag) = in_vacations {
        if shop.in_vacations != flag {
            return false;
        }
    }
    if let Some(after) = created_after {
        if shop.created_at <= after {
            return false;
        }
    }
    if let Some(before) = created_before {
        if shop.created_at >= before {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::{NaiveTime, Weekday};
    use rust_decimal::Decimal;

    use shopapp_core::{OpeningHours, ProductId};

    use super::*;
    use crate::db::RepositoryError;
    use crate::models::{DerivedPrices, Product};

    /// In-memory stand-in for the `PostgreSQL` store.
    ///
    /// Mirrors the repository's observable behavior: derived product counts,
    /// id-ordered defaults, strict date filters, page totals.
    #[derive(Default)]
    struct MemoryStore {
        shops: Mutex<BTreeMap<i64, Shop>>,
        products: Mutex<BTreeMap<i64, Product>>,
        next_id: AtomicI64,
    }

    /// Creation date stamped on shops inserted through the store.
    const INSERT_DATE: &str = "2024-05-10";

    impl MemoryStore {
        fn seed_shop(&self, id: i64, name: &str, created_at: &str, in_vacations: bool) {
            let shop = Shop {
                id: ShopId::new(id),
                name: name.to_string(),
                created_at: created_at.parse().expect("valid date"),
                in_vacations,
                opening_hours: Vec::new(),
                nb_products: 0,
            };
            self.shops.lock().expect("lock").insert(id, shop);
        }

        fn seed_product(&self, id: i64, shop_id: Option<i64>) {
            let product = Product {
                id: ProductId::new(id),
                price: Decimal::new(500, 2),
                derived_prices: DerivedPrices::of(Decimal::new(500, 2)),
                shop_id: shop_id.map(ShopId::new),
                categories: Vec::new(),
            };
            self.products.lock().expect("lock").insert(id, product);
        }

        fn shop_count(&self) -> usize {
            self.shops.lock().expect("lock").len()
        }

        fn product(&self, id: i64) -> Product {
            self.products.lock().expect("lock")[&id].clone()
        }

        fn with_count(&self, mut shop: Shop) -> Shop {
            let products = self.products.lock().expect("lock");
            shop.nb_products = products
                .values()
                .filter(|p| p.shop_id == Some(shop.id))
                .count() as i64;
            shop
        }
    }

    impl ShopStore for MemoryStore {
        async fn find_shop(&self, id: ShopId) -> std::result::Result<Option<Shop>, RepositoryError> {
            let shop = self.shops.lock().expect("lock").get(&id.as_i64()).cloned();
            Ok(shop.map(|s| self.with_count(s)))
        }

        async fn insert_shop(&self, draft: &ShopDraft) -> std::result::Result<ShopId, RepositoryError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let shop = Shop {
                id: ShopId::new(id),
                name: draft.name.clone(),
                created_at: INSERT_DATE.parse().expect("valid date"),
                in_vacations: draft.in_vacations,
                opening_hours: draft.opening_hours.clone(),
                nb_products: 0,
            };
            self.shops.lock().expect("lock").insert(id, shop);
            Ok(ShopId::new(id))
        }

        async fn replace_shop(
            &self,
            id: ShopId,
            draft: &ShopDraft,
        ) -> std::result::Result<(), RepositoryError> {
            let mut shops = self.shops.lock().expect("lock");
            let shop = shops
                .get_mut(&id.as_i64())
                .ok_or(RepositoryError::NotFound)?;
            shop.name = draft.name.clone();
            shop.in_vacations = draft.in_vacations;
            shop.opening_hours = draft.opening_hours.clone();
            Ok(())
        }

        async fn delete_shop(&self, id: ShopId) -> std::result::Result<(), RepositoryError> {
            let attached = self
                .products
                .lock()
                .expect("lock")
                .values()
                .any(|p| p.shop_id == Some(id));
            // The real store would reject the delete while products still
            // reference the shop.
            assert!(!attached, "products must be detached before shop delete");
            self.shops
                .lock()
                .expect("lock")
                .remove(&id.as_i64())
                .ok_or(RepositoryError::NotFound)?;
            Ok(())
        }

        async fn products_of_shop(&self, id: ShopId) -> std::result::Result<Vec<Product>, RepositoryError> {
            Ok(self
                .products
                .lock()
                .expect("lock")
                .values()
                .filter(|p| p.shop_id == Some(id))
                .cloned()
                .collect())
        }

        async fn detach_product(&self, id: ProductId) -> std::result::Result<(), RepositoryError> {
            let mut products = self.products.lock().expect("lock");
            let product = products
                .get_mut(&id.as_i64())
                .ok_or(RepositoryError::NotFound)?;
            product.shop_id = None;
            Ok(())
        }

        async fn list_shops(
            &self,
            query: &ListQuery,
            pageable: Pageable,
        ) -> std::result::Result<Page<Shop>, RepositoryError> {
            use crate::db::{ShopFilter, ShopSort};

            let mut shops: Vec<Shop> = self
                .shops
                .lock()
                .expect("lock")
                .values()
                .cloned()
                .map(|s| self.with_count(s))
                .collect();

            match query {
                ListQuery::SortedBy(ShopSort::Name) => shops.sort_by(|a, b| a.name.cmp(&b.name)),
                ListQuery::SortedBy(ShopSort::CreatedAt) => {
                    shops.sort_by_key(|s| s.created_at);
                }
                ListQuery::SortedBy(ShopSort::ProductCount) => {
                    shops.sort_by_key(|s| s.nb_products);
                }
                ListQuery::Filtered(filter) => {
                    shops.retain(|s| match *filter {
                        ShopFilter::VacationsCreatedBetween {
                            in_vacations,
                            after,
                            before,
                        } => {
                            s.in_vacations == in_vacations
                                && s.created_at > after
                                && s.created_at < before
                        }
                        ShopFilter::VacationsCreatedBefore {
                            in_vacations,
                            before,
                        } => s.in_vacations == in_vacations && s.created_at < before,
                        ShopFilter::VacationsCreatedAfter {
                            in_vacations,
                            after,
                        } => s.in_vacations == in_vacations && s.created_at > after,
                        ShopFilter::Vacations { in_vacations } => s.in_vacations == in_vacations,
                        ShopFilter::CreatedBetween { after, before } => {
                            s.created_at > after && s.created_at < before
                        }
                        ShopFilter::CreatedBefore { before } => s.created_at < before,
                        ShopFilter::CreatedAfter { after } => s.created_at > after,
                    });
                }
                ListQuery::ByIdAsc => {}
            }

            Ok(Page::from_complete(shops, pageable))
        }

        async fn shops_by_ids(&self, ids: &[ShopId]) -> std::result::Result<Vec<Shop>, RepositoryError> {
            let shops = self.shops.lock().expect("lock");
            Ok(ids
                .iter()
                .filter_map(|id| shops.get(&id.as_i64()).cloned())
                .map(|s| self.with_count(s))
                .collect())
        }

        async fn all_shops(&self) -> std::result::Result<Vec<Shop>, RepositoryError> {
            let shops = self.shops.lock().expect("lock");
            Ok(shops.values().cloned().map(|s| self.with_count(s)).collect())
        }
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).expect("valid time")
    }

    fn draft(name: &str, in_vacations: bool, hours: Vec<OpeningHours>) -> ShopDraft {
        ShopDraft {
            name: name.to_string(),
            in_vacations,
            opening_hours: hours,
        }
    }

    fn conflicting_hours() -> Vec<OpeningHours> {
        vec![
            OpeningHours::new(Weekday::Mon, t(9), t(12)),
            OpeningHours::new(Weekday::Mon, t(11), t(14)),
        ]
    }

    fn fixture() -> (MemoryStore, ShopIndex) {
        (MemoryStore::default(), ShopIndex::new().expect("index"))
    }

    #[tokio::test]
    async fn test_create_returns_refreshed_shop_and_indexes_it() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);

        let shop = service
            .create(&draft(
                "Bakery du Coin",
                false,
                vec![OpeningHours::new(Weekday::Mon, t(9), t(12))],
            ))
            .await
            .expect("create");

        assert_eq!(shop.name, "Bakery du Coin");
        assert_eq!(shop.created_at, INSERT_DATE.parse().expect("valid date"));
        assert_eq!(shop.nb_products, 0);
        assert_eq!(index.search_all("bakery").expect("search"), vec![shop.id]);
    }

    #[tokio::test]
    async fn test_create_with_conflicting_hours_writes_nothing() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);

        let err = service
            .create(&draft("Bakery", false, conflicting_hours()))
            .await
            .expect_err("must fail");

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.shop_count(), 0);
        assert!(index.search_all("bakery").expect("search").is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_shop_writes_nothing() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);

        let err = service
            .update(ShopId::new(99), &draft("Bakery", false, Vec::new()))
            .await
            .expect_err("must fail");

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "not found: shop with id 99 not found");
        assert_eq!(store.shop_count(), 0);
    }

    #[tokio::test]
    async fn test_update_revalidates_hours() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);

        let shop = service
            .create(&draft("Bakery", false, Vec::new()))
            .await
            .expect("create");
        let err = service
            .update(shop.id, &draft("Bakery", false, conflicting_hours()))
            .await
            .expect_err("must fail");

        assert!(matches!(err, AppError::Validation(_)));
        let unchanged = service.get_by_id(shop.id).await.expect("get");
        assert!(unchanged.opening_hours.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_record_and_reindexes() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);

        let shop = service
            .create(&draft("Bakery", false, Vec::new()))
            .await
            .expect("create");
        let updated = service
            .update(
                shop.id,
                &draft(
                    "Fishmonger",
                    true,
                    vec![OpeningHours::new(Weekday::Tue, t(8), t(13))],
                ),
            )
            .await
            .expect("update");

        assert_eq!(updated.id, shop.id);
        assert_eq!(updated.name, "Fishmonger");
        assert!(updated.in_vacations);
        assert_eq!(updated.opening_hours.len(), 1);
        assert!(index.search_all("bakery").expect("search").is_empty());
        assert_eq!(
            index.search_all("fishmonger").expect("search"),
            vec![shop.id]
        );
    }

    #[tokio::test]
    async fn test_delete_detaches_products_then_removes_shop() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);

        let shop = service
            .create(&draft("Bakery", false, Vec::new()))
            .await
            .expect("create");
        store.seed_product(1, Some(shop.id.as_i64()));
        store.seed_product(2, Some(shop.id.as_i64()));
        store.seed_product(3, None);

        service.delete(shop.id).await.expect("delete");

        assert_eq!(store.shop_count(), 0);
        assert_eq!(store.product(1).shop_id, None);
        assert_eq!(store.product(2).shop_id, None);
        assert!(index.search_all("bakery").expect("search").is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_shop_fails() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);

        let err = service.delete(ShopId::new(7)).await.expect_err("must fail");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);
        store.seed_shop(5, "Cheese Corner", "2024-02-02", false);

        let shop = service.get_by_id(ShopId::new(5)).await.expect("get");
        assert_eq!(shop.name, "Cheese Corner");

        let err = service.get_by_id(ShopId::new(6)).await.expect_err("missing");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_by_id_counts_products() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);
        store.seed_shop(5, "Cheese Corner", "2024-02-02", false);
        store.seed_product(1, Some(5));
        store.seed_product(2, Some(5));

        let shop = service.get_by_id(ShopId::new(5)).await.expect("get");
        assert_eq!(shop.nb_products, 2);
    }

    #[tokio::test]
    async fn test_list_sort_key_ignores_filters() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);
        store.seed_shop(1, "Zinc", "2024-01-05", false);
        store.seed_shop(2, "Attic", "2024-03-05", true);

        let params = ListParams {
            sort_by: Some("name".to_string()),
            in_vacations: Some(true), // would exclude "Zinc" if applied
            ..ListParams::default()
        };
        let page = service
            .list(&params, Pageable::default())
            .await
            .expect("list");

        let names: Vec<&str> = page.items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Attic", "Zinc"]);
        assert_eq!(page.total_elements, 2);
    }

    #[tokio::test]
    async fn test_list_combined_filters_are_strict() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);
        store.seed_shop(1, "On lower bound", "2024-01-01", true);
        store.seed_shop(2, "Inside", "2024-03-15", true);
        store.seed_shop(3, "On upper bound", "2024-06-01", true);
        store.seed_shop(4, "Not on vacation", "2024-03-15", false);

        let params = ListParams {
            in_vacations: Some(true),
            created_after: Some("2024-01-01".to_string()),
            created_before: Some("2024-06-01".to_string()),
            ..ListParams::default()
        };
        let page = service
            .list(&params, Pageable::default())
            .await
            .expect("list");

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items.first().map(|s| s.name.as_str()), Some("Inside"));
    }

    #[tokio::test]
    async fn test_list_without_parameters_is_id_ascending() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);
        store.seed_shop(2, "Second", "2024-01-02", false);
        store.seed_shop(1, "First", "2024-01-01", true);

        let page = service
            .list(&ListParams::default(), Pageable::default())
            .await
            .expect("list");

        let ids: Vec<i64> = page.items.iter().map(|s| s.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_list_sort_key_never_parses_filter_dates() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);
        store.seed_shop(1, "Zinc", "2024-01-05", false);
        store.seed_shop(2, "Attic", "2024-03-05", true);

        // With a sort key the filters are ignored outright, so a date string
        // that would never parse must not fail the request.
        let params = ListParams {
            sort_by: Some("name".to_string()),
            created_after: Some("not-a-date".to_string()),
            ..ListParams::default()
        };
        let page = service
            .list(&params, Pageable::default())
            .await
            .expect("sorted listing");

        let names: Vec<&str> = page.items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Attic", "Zinc"]);
    }

    #[tokio::test]
    async fn test_list_rejects_malformed_date() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);

        let params = ListParams {
            created_after: Some("last tuesday".to_string()),
            ..ListParams::default()
        };
        let err = service
            .list(&params, Pageable::default())
            .await
            .expect_err("must fail");
        assert!(matches!(err, AppError::InvalidDate(_)));
    }

    #[tokio::test]
    async fn test_search_merges_name_match_with_vacation_filter() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);

        service
            .create(&draft("Bakery One", false, Vec::new()))
            .await
            .expect("create");
        service
            .create(&draft("Bakery Two", true, Vec::new()))
            .await
            .expect("create");
        service
            .create(&draft("Cheese Corner", false, Vec::new()))
            .await
            .expect("create");

        let params = SearchParams {
            in_vacations: Some(false),
            ..SearchParams::default()
        };
        let page = service
            .search_by_name("bakery", &params, Pageable::default())
            .await
            .expect("search");

        assert_eq!(page.total_elements, 1);
        assert_eq!(
            page.items.first().map(|s| s.name.as_str()),
            Some("Bakery One")
        );
    }

    #[tokio::test]
    async fn test_search_applies_all_present_filters() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);
        store.seed_shop(1, "Bakery Old", "2023-12-01", true);
        store.seed_shop(2, "Bakery Kept", "2024-03-15", true);
        store.seed_shop(3, "Bakery Open", "2024-03-15", false);
        index
            .rebuild(&store.all_shops().await.expect("all"))
            .expect("rebuild");

        let params = SearchParams {
            in_vacations: Some(true),
            created_after: Some("2024-01-01".to_string()),
            created_before: Some("2024-06-01".to_string()),
        };
        let page = service
            .search_by_name("bakery", &params, Pageable::default())
            .await
            .expect("search");

        assert_eq!(page.total_elements, 1);
        assert_eq!(
            page.items.first().map(|s| s.name.as_str()),
            Some("Bakery Kept")
        );
    }

    #[tokio::test]
    async fn test_search_slices_one_page_but_keeps_full_total() {
        let (store, index) = fixture();
        let service = ShopService::new(&store, &index);
        for i in 1..=5 {
            service
                .create(&draft(&format!("Bakery {i}"), false, Vec::new()))
                .await
                .expect("create");
        }

        let page = service
            .search_by_name("bakery", &SearchParams::default(), Pageable::new(1, 2))
            .await
            .expect("search");

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_matches_filters_conjunction() {
        let shop = Shop {
            id: ShopId::new(1),
            name: "Bakery".to_string(),
            created_at: "2024-03-15".parse().expect("valid date"),
            in_vacations: true,
            opening_hours: Vec::new(),
            nb_products: 0,
        };
        let date = |s: &str| s.parse().expect("valid date");

        assert!(matches_filters(&shop, None, None, None));
        assert!(matches_filters(
            &shop,
            Some(true),
            Some(date("2024-06-01")),
            Some(date("2024-01-01"))
        ));
        // Any single failing filter rejects, regardless of later ones.
        assert!(!matches_filters(
            &shop,
            Some(false),
            Some(date("2024-06-01")),
            None
        ));
        // Bounds are strict.
        assert!(!matches_filters(&shop, None, Some(date("2024-03-15")), None));
        assert!(!matches_filters(&shop, None, None, Some(date("2024-03-15"))));
    }
}
