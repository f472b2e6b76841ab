//! Query expression types and AST nodes.

use crate::types::RelatedField;

use super::wildcard::WildcardPattern;

/// A parsed query expression (AST node).
///
/// Trees are built once per search and only borrowed during evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryExpression {
    Term(QueryTerm),
    Not(Box<QueryExpression>),
    And(Vec<QueryExpression>),
    Or(Vec<QueryExpression>),
    /// Parenthesised sub-expression. Evaluates to its child unchanged.
    Group(Box<QueryExpression>),
}

/// A single query term (leaf node in the AST).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTerm {
    /// Unqualified text matched against the configured text fields.
    Text(WildcardPattern),
    /// `field:value` matched against a related entity.
    Field {
        field: RelatedField,
        pattern: WildcardPattern,
    },
}

impl QueryExpression {
    pub fn text(pattern: WildcardPattern) -> Self {
        Self::Term(QueryTerm::Text(pattern))
    }

    pub fn field(field: RelatedField, pattern: WildcardPattern) -> Self {
        Self::Term(QueryTerm::Field { field, pattern })
    }

    pub fn negate(inner: QueryExpression) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn group(inner: QueryExpression) -> Self {
        Self::Group(Box::new(inner))
    }

    /// True for the empty conjunction produced by a blank query.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::And(parts) | Self::Or(parts) if parts.is_empty())
    }
}

/// Checks if an expression contains at least one concrete term.
pub fn query_expression_has_terms(expression: &QueryExpression) -> bool {
    match expression {
        QueryExpression::Term(_) => true,
        QueryExpression::Not(inner) | QueryExpression::Group(inner) => {
            query_expression_has_terms(inner)
        }
        QueryExpression::And(parts) | QueryExpression::Or(parts) => {
            parts.iter().any(query_expression_has_terms)
        }
    }
}

/// Renders an expression as a compact s-expression for logs.
pub fn describe_query_expression(expression: &QueryExpression) -> String {
    match expression {
        QueryExpression::Term(QueryTerm::Text(pattern)) => format!("\"{pattern}\""),
        QueryExpression::Term(QueryTerm::Field { field, pattern }) => {
            format!("{}:\"{pattern}\"", field.as_str())
        }
        QueryExpression::Not(inner) => format!("(not {})", describe_query_expression(inner)),
        QueryExpression::Group(inner) => format!("({})", describe_query_expression(inner)),
        QueryExpression::And(parts) => describe_parts("and", parts),
        QueryExpression::Or(parts) => describe_parts("or", parts),
    }
}

fn describe_parts(operator: &str, parts: &[QueryExpression]) -> String {
    let rendered = parts
        .iter()
        .map(describe_query_expression)
        .collect::<Vec<_>>()
        .join(" ");
    if rendered.is_empty() {
        format!("({operator})")
    } else {
        format!("({operator} {rendered})")
    }
}
