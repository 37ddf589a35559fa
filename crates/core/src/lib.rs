//! Shopapp Core - Shared types library.
//!
//! This crate provides the domain types shared between the backend library
//! and any host binaries embedding it:
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain logic - no I/O, no
//! database access, no search index. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, currency table, opening hours, pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
