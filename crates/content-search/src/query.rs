//! Query parsing, compilation, and evaluation for advanced search.
//!
//! This module provides the advanced-search query language, including:
//! - Expression types (AND, OR, NOT, groups, terms)
//! - Field qualifiers (`author:`, `tag:`, `metatype:`) and wildcards
//! - Query parsing and tokenization
//! - Query optimization (flattening, reordering by cost)
//! - Evaluation against a `RecordStore` by id-set algebra

mod compiled;
mod evaluate;
mod expression;
mod optimizer;
mod parser;
mod wildcard;

// Re-export public types
pub use compiled::CompiledQuery;
pub use evaluate::{evaluate_expression, EvaluationContext};
pub use expression::{describe_query_expression, QueryExpression, QueryTerm};
pub use optimizer::optimize_expression;
pub use parser::{tokenize_query_input, QueryParser, QueryToken, QueryTokenKind};
pub use wildcard::{MatchAnchor, WildcardPattern};
