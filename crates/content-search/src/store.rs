//! Record store abstraction.
//!
//! This module provides:
//! - The `RecordStore` trait the query evaluator issues lookups against
//! - The published scope every lookup is confined to
//! - An in-memory store over a list of records

mod memory;
mod scope;
mod traits;

pub use memory::{MemoryStore, TagCount};
pub use scope::PublishedScope;
pub use traits::RecordStore;
