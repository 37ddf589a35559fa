//! Orchestration layer invoked by the host request layer.

pub mod shops;

pub use shops::{ListParams, SearchParams, ShopService};
