//! Domain records persisted by the store.

pub mod product;
pub mod shop;

pub use product::{Category, DerivedPrices, Product, ProductDraft};
pub use shop::{Shop, ShopDraft};
