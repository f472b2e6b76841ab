//! Search over a record store.

use std::time::Instant;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::query::{CompiledQuery, WildcardPattern};
use crate::store::{PublishedScope, RecordStore};
use crate::types::{IdSet, ResultSet};

/// Runs an advanced search.
///
/// Fails with `MalformedQuery` only for the bare `*` query; every other input
/// is interpreted leniently. Blank queries return an empty result.
pub fn search<S: RecordStore + ?Sized>(
    raw_query: &str,
    store: &S,
    scope: &PublishedScope,
    config: &SearchConfig,
) -> Result<ResultSet> {
    let started = Instant::now();
    let query = CompiledQuery::compile(raw_query, config)?;
    let results = query.evaluate(store, scope);
    log::debug!(
        "advanced search site={} results={} elapsed_us={}",
        scope.site(),
        results.len(),
        started.elapsed().as_micros(),
    );
    Ok(results)
}

/// Runs a basic search, bypassing the query parser.
///
/// The query is split on whitespace and a record matches when any word is
/// contained in any of the configured basic text fields.
pub fn basic_search<S: RecordStore + ?Sized>(
    raw_query: &str,
    store: &S,
    scope: &PublishedScope,
    config: &SearchConfig,
) -> ResultSet {
    let mut matched = IdSet::default();
    for word in raw_query.split_whitespace() {
        let pattern = WildcardPattern::literal(word);
        matched.extend(
            store
                .filter_by_text_contains(config.basic_text_fields.as_slice(), &pattern, scope)
                .iter()
                .copied(),
        );
    }
    if matched.is_empty() {
        return ResultSet::new();
    }
    store.order(&matched)
}

/// Runs an advanced search, retrying as a basic search when the query is
/// malformed.
pub fn search_with_fallback<S: RecordStore + ?Sized>(
    raw_query: &str,
    store: &S,
    scope: &PublishedScope,
    config: &SearchConfig,
) -> Result<ResultSet> {
    match search(raw_query, store, scope, config) {
        Err(error) if error.is_malformed_query() => {
            log::info!("falling back to basic search: {}", error);
            Ok(basic_search(raw_query, store, scope, config))
        }
        other => other,
    }
}
