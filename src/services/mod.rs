pub mod catalog;
pub mod filter;
pub mod providers;
pub mod selector;
pub mod tags;

pub use catalog::{Catalog, CatalogOrigin, PersistedStore};
pub use filter::{filter_shows, FilterSelection};
pub use selector::{AssistLimits, Selector};
