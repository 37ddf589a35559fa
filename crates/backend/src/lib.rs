//! Shop management backend library.
//!
//! Provides the service layer for a shop/product backend: shop CRUD with
//! opening-hours validation, filtered and paginated listing, and full-text
//! search over shop names. The crate is embedded by a host request layer
//! that passes already-parsed parameters; no HTTP surface lives here.
//!
//! # Modules
//!
//! - [`config`] - Environment-based configuration
//! - [`error`] - Application error taxonomy
//! - [`models`] - Shop, product and category records
//! - [`db`] - `PostgreSQL` store (pool, repositories, query intents)
//! - [`search`] - Tantivy full-text index over shop names
//! - [`services`] - Orchestration: lifecycle, listing, search merge

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod search;
pub mod services;
