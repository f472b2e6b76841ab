//! Compiled queries ready for evaluation.

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::store::{PublishedScope, RecordStore};
use crate::types::{ResultSet, TextField};

use super::evaluate::{evaluate_expression, EvaluationContext};
use super::expression::{describe_query_expression, QueryExpression};
use super::optimizer::optimize_expression;
use super::parser::{is_wildcard_all, QueryParser};

/// A parsed and optimized advanced-search query.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    raw: String,
    expression: QueryExpression,
    text_fields: Vec<TextField>,
}

impl CompiledQuery {
    /// Compiles a raw query string.
    ///
    /// The compilation pipeline:
    /// 1. Reject the bare `*` query
    /// 2. Truncate to the configured maximum length
    /// 3. Parse the raw query string into an AST
    /// 4. Optimize the expression (drop groups, flatten nested AND/OR, reorder by cost)
    pub fn compile(raw_query: &str, config: &SearchConfig) -> Result<Self> {
        if is_wildcard_all(raw_query) {
            return Err(SearchError::MalformedQuery(
                "the wildcard-all query `*` is not supported".to_string(),
            ));
        }
        // Truncation may leave a lone `*`; it is an ordinary all-star word then.
        let raw = truncate_query(raw_query, config.max_query_length);
        let parsed = QueryParser::parse_lenient(raw);
        let expression = optimize_expression(parsed);
        log::debug!(
            "compiled query {:?} as {}",
            raw,
            describe_query_expression(&expression)
        );

        Ok(Self {
            raw: raw.to_string(),
            expression,
            text_fields: config.text_fields.clone(),
        })
    }

    /// Returns the query text that was parsed (after truncation).
    pub fn raw(&self) -> &str {
        self.raw.as_str()
    }

    /// Returns the optimized expression.
    pub fn expression(&self) -> &QueryExpression {
        &self.expression
    }

    pub fn is_empty(&self) -> bool {
        self.expression.is_empty()
    }

    /// Evaluates the query, returning ids in the store's canonical order.
    ///
    /// The compiled tree is only borrowed, so repeated evaluation against an
    /// unchanged store yields identical output.
    pub fn evaluate<S: RecordStore + ?Sized>(&self, store: &S, scope: &PublishedScope) -> ResultSet {
        if self.is_empty() {
            return ResultSet::new();
        }
        let context = EvaluationContext::new(store, scope, self.text_fields.as_slice());
        let ids = evaluate_expression(&self.expression, &context);
        store.order(&ids)
    }
}

/// Cuts `raw` to at most `max_len` bytes on a char boundary.
fn truncate_query(raw: &str, max_len: usize) -> &str {
    if raw.len() <= max_len {
        return raw;
    }
    let mut end = max_len;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    log::warn!(
        "search query truncated from {} to {} bytes",
        raw.len(),
        end
    );
    &raw[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_query("héllo", 2), "h");
        assert_eq!(truncate_query("héllo", 3), "hé");
        assert_eq!(truncate_query("short", 64), "short");
    }

    #[test]
    fn compile_applies_length_limit() {
        let config = SearchConfig {
            max_query_length: 7,
            ..SearchConfig::default()
        };
        let query = CompiledQuery::compile("content and more", &config).unwrap();
        assert_eq!(query.raw(), "content");
    }

    #[test]
    fn bare_wildcard_is_rejected_before_truncation() {
        let config = SearchConfig {
            max_query_length: 1,
            ..SearchConfig::default()
        };
        let error = CompiledQuery::compile(" * ", &config).unwrap_err();
        assert!(error.is_malformed_query());

        let query = CompiledQuery::compile("* star", &config).unwrap();
        assert_eq!(query.raw(), "*");
        assert!(!query.is_empty());
    }

    #[test]
    fn compile_optimizes_groups_away() {
        let query = CompiledQuery::compile("((content))", &SearchConfig::default()).unwrap();
        assert!(matches!(query.expression(), QueryExpression::Term(_)));
    }

    #[test]
    fn blank_query_compiles_empty() {
        let query = CompiledQuery::compile("  ", &SearchConfig::default()).unwrap();
        assert!(query.is_empty());
    }
}
