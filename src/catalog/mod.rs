//! Upstream catalog integration.
//!
//! - `client` - HTTP calls, response envelope, lookup strategies
//! - `models` - normalized character shapes served to clients
//! - `normalize` - mapping of heterogeneous upstream records

mod client;
mod models;
pub mod normalize;

pub use client::{CatalogClient, LookupStrategy, LIST_PAGE_SIZE};
pub use models::{CharacterDetail, CharacterSummary};
