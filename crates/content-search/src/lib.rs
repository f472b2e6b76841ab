//! Advanced search for published content records.
//!
//! This crate provides:
//! - A query language with boolean operators, grouping, quoted phrases,
//!   field qualifiers (`author:`, `tag:`, `metatype:`) and wildcards
//! - Evaluation against a pluggable `RecordStore` by id-set algebra
//! - Basic substring search and the fallback between the two
//! - An in-memory store applying the published scope

pub mod config;
pub mod error;
pub mod query;
pub mod search;
pub mod store;
pub mod types;

// Re-export main types
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use query::{CompiledQuery, QueryExpression, QueryParser, QueryTerm, WildcardPattern};
pub use search::{basic_search, search, search_with_fallback, SearchManager};
pub use store::{MemoryStore, PublishedScope, RecordStore};
pub use types::{Metatype, Record, RecordId, RelatedField, ResultSet, Status, TextField};
