//! Full-text search over shop names using Tantivy.
//!
//! The index lives in RAM and is kept in sync by the service layer: shops
//! are (re)indexed on create/update and removed on delete. The host calls
//! [`ShopIndex::rebuild`] once at startup to seed it from the store.

use std::sync::{Arc, Mutex};

use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::{
    Field, INDEXED, IndexRecordOption, STORED, Schema, TextFieldIndexing, TextOptions, Value,
};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term, doc};
use thiserror::Error;
use tracing::{debug, instrument};

use shopapp_core::ShopId;

use crate::models::Shop;

/// Upper bound on hits per query. The search path wants the complete hit
/// set, so this only guards against a runaway index.
const FETCH_ALL_LIMIT: usize = 10_000;

const WRITER_BUFFER_BYTES: usize = 15_000_000;

/// Errors from search index operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Index maintenance failed.
    #[error("index error: {0}")]
    Index(String),
    /// Query execution failed.
    #[error("query error: {0}")]
    Query(String),
}

/// Schema field handles for the shop index.
#[derive(Clone, Copy)]
struct ShopFields {
    id: Field,
    name: Field,
}

struct Inner {
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    fields: ShopFields,
}

/// In-RAM full-text index over shop names.
#[derive(Clone)]
pub struct ShopIndex {
    inner: Arc<Inner>,
}

impl ShopIndex {
    /// Create an empty index.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Index` if the writer or reader cannot be set up.
    pub fn new() -> Result<Self, SearchError> {
        let mut schema_builder = Schema::builder();
        let id = schema_builder.add_i64_field("id", INDEXED | STORED);

        let name_indexing = TextFieldIndexing::default()
            .set_tokenizer("shop_name")
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);
        let name =
            schema_builder.add_text_field("name", TextOptions::default().set_indexing_options(name_indexing));
        let schema = schema_builder.build();

        let index = Index::create_in_ram(schema);
        index.tokenizers().register(
            "shop_name",
            tantivy::tokenizer::TextAnalyzer::builder(
                tantivy::tokenizer::SimpleTokenizer::default(),
            )
            .filter(tantivy::tokenizer::LowerCaser)
            .build(),
        );

        let writer = index
            .writer(WRITER_BUFFER_BYTES)
            .map_err(|e| SearchError::Index(format!("Failed to create writer: {e}")))?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| SearchError::Index(format!("Failed to create reader: {e}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                reader,
                writer: Mutex::new(writer),
                fields: ShopFields { id, name },
            }),
        })
    }

    /// Add or replace one shop document.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Index` if the write or commit fails.
    #[instrument(skip(self, shop), fields(id = %shop.id))]
    pub fn index_shop(&self, shop: &Shop) -> Result<(), SearchError> {
        let fields = self.inner.fields;
        let mut writer = self.lock_writer()?;
        writer.delete_term(Term::from_field_i64(fields.id, shop.id.as_i64()));
        writer
            .add_document(doc!(
                fields.id => shop.id.as_i64(),
                fields.name => shop.name.as_str(),
            ))
            .map_err(|e| SearchError::Index(format!("Failed to add document: {e}")))?;
        self.commit(&mut writer)
    }

    /// Remove one shop document.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Index` if the commit fails.
    #[instrument(skip(self))]
    pub fn remove_shop(&self, id: ShopId) -> Result<(), SearchError> {
        let fields = self.inner.fields;
        let mut writer = self.lock_writer()?;
        writer.delete_term(Term::from_field_i64(fields.id, id.as_i64()));
        self.commit(&mut writer)
    }

    /// Drop everything and re-index the given shops.
    ///
    /// Called once at startup with the full store contents.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Index` if any write or the commit fails.
    #[instrument(skip_all, fields(count = shops.len()))]
    pub fn rebuild(&self, shops: &[Shop]) -> Result<(), SearchError> {
        let fields = self.inner.fields;
        let mut writer = self.lock_writer()?;
        writer
            .delete_all_documents()
            .map_err(|e| SearchError::Index(format!("Failed to clear index: {e}")))?;
        for shop in shops {
            writer
                .add_document(doc!(
                    fields.id => shop.id.as_i64(),
                    fields.name => shop.name.as_str(),
                ))
                .map_err(|e| SearchError::Index(format!("Failed to add document: {e}")))?;
        }
        self.commit(&mut writer)?;
        debug!(count = shops.len(), "Rebuilt shop index");
        Ok(())
    }

    /// Match a free-text query against shop names and return the complete
    /// hit set, best score first.
    ///
    /// Each whitespace-separated term matches exactly, and fuzzily (distance
    /// 1) from three characters up. An empty query matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Query` if query execution fails.
    #[instrument(skip(self))]
    pub fn search_all(&self, query_str: &str) -> Result<Vec<ShopId>, SearchError> {
        let query_str = query_str.trim().to_lowercase();
        if query_str.is_empty() {
            return Ok(Vec::new());
        }

        let fields = self.inner.fields;
        let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for term in query_str.split_whitespace() {
            let name_term = Term::from_field_text(fields.name, term);
            subqueries.push((
                Occur::Should,
                Box::new(TermQuery::new(name_term.clone(), IndexRecordOption::Basic)),
            ));
            if term.len() >= 3 {
                subqueries.push((
                    Occur::Should,
                    Box::new(FuzzyTermQuery::new(name_term, 1, true)),
                ));
            }
        }
        let query = BooleanQuery::new(subqueries);

        let searcher = self.inner.reader.searcher();
        let hits = searcher
            .search(&query, &TopDocs::with_limit(FETCH_ALL_LIMIT))
            .map_err(|e| SearchError::Query(format!("Search failed: {e}")))?;

        let mut ids = Vec::with_capacity(hits.len());
        for (_score, address) in hits {
            let document: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| SearchError::Query(format!("Doc fetch failed: {e}")))?;
            if let Some(id) = document.get_first(fields.id).and_then(|v| v.as_i64()) {
                ids.push(ShopId::new(id));
            }
        }

        debug!(hits = ids.len(), "Searched shop names");
        Ok(ids)
    }

    fn lock_writer(&self) -> Result<std::sync::MutexGuard<'_, IndexWriter>, SearchError> {
        self.inner
            .writer
            .lock()
            .map_err(|_| SearchError::Index("Lock poisoned".to_string()))
    }

    fn commit(&self, writer: &mut IndexWriter) -> Result<(), SearchError> {
        writer
            .commit()
            .map_err(|e| SearchError::Index(format!("Failed to commit: {e}")))?;
        self.inner
            .reader
            .reload()
            .map_err(|e| SearchError::Index(format!("Failed to reload reader: {e}")))
    }
}
