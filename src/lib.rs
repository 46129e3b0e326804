//! Picks something to watch from a personal media tracker's shows.
//!
//! Shows come from the main application (pushed into shared state, or read
//! from its persisted blob), get filtered by category, status, search text
//! and tags, and one candidate is chosen at random or by a text-generation
//! service, with any failure of the latter degrading to a random pick.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod presenter;
pub mod services;
