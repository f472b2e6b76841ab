use std::path::Path;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::query::{CompiledQuery, QueryExpression};
use crate::store::{PublishedScope, RecordStore};
use crate::types::ResultSet;

use super::engine::{basic_search, search, search_with_fallback};

/// Binds a record store to search settings.
#[derive(Debug, Clone)]
pub struct SearchManager<S> {
    store: S,
    config: SearchConfig,
}

impl<S: RecordStore> SearchManager<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, SearchConfig::default())
    }

    pub fn with_config(store: S, config: SearchConfig) -> Self {
        Self { store, config }
    }

    /// Creates a manager whose config is read from `path`, or defaults.
    pub fn from_config_file(store: S, path: &Path) -> Self {
        Self::with_config(store, SearchConfig::load_or_default(path))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Parses and optimizes a query without evaluating it.
    pub fn parse(&self, raw_query: &str) -> Result<QueryExpression> {
        CompiledQuery::compile(raw_query, &self.config).map(|query| query.expression().clone())
    }

    pub fn compile(&self, raw_query: &str) -> Result<CompiledQuery> {
        CompiledQuery::compile(raw_query, &self.config)
    }

    pub fn search(&self, raw_query: &str, scope: &PublishedScope) -> Result<ResultSet> {
        search(raw_query, &self.store, scope, &self.config)
    }

    pub fn basic_search(&self, raw_query: &str, scope: &PublishedScope) -> ResultSet {
        basic_search(raw_query, &self.store, scope, &self.config)
    }

    pub fn search_with_fallback(
        &self,
        raw_query: &str,
        scope: &PublishedScope,
    ) -> Result<ResultSet> {
        search_with_fallback(raw_query, &self.store, scope, &self.config)
    }
}
