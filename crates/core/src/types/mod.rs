//! Core types for the shop backend.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod currency;
pub mod hours;
pub mod id;
pub mod page;

pub use currency::Currency;
pub use hours::{OpeningHours, overlapping};
pub use id::*;
pub use page::{Page, Pageable};
