//! Search entry points.
//!
//! This module provides:
//! - Advanced, basic and fallback search functions over any `RecordStore`
//! - The `SearchManager` binding a store to a `SearchConfig`

mod engine;
mod manager;

// Re-export main types
pub use engine::{basic_search, search, search_with_fallback};
pub use manager::SearchManager;
