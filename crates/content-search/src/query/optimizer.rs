//! Query optimization before evaluation.
//!
//! Applies deterministic rewrites that make evaluation cheaper without
//! changing the result set:
//! - Drops `Group` wrappers (parentheses only matter while parsing)
//! - Cancels double negation
//! - Flattens nested AND/OR expressions
//! - Reorders AND operands by cost (related lookups first, negations last)

use super::expression::{QueryExpression, QueryTerm};

/// Optimizes a query expression for efficient evaluation.
///
/// The function never mutates the input; a new tree is returned.
pub fn optimize_expression(expr: QueryExpression) -> QueryExpression {
    match expr {
        QueryExpression::And(parts) => optimize_and(parts),
        QueryExpression::Or(parts) => optimize_or(parts),
        QueryExpression::Group(inner) => optimize_expression(*inner),
        QueryExpression::Not(inner) => match optimize_expression(*inner) {
            // Every store lookup is already confined to the published scope,
            // so scope - (scope - x) == x.
            QueryExpression::Not(twice) => *twice,
            other => QueryExpression::negate(other),
        },
        QueryExpression::Term(_) => expr,
    }
}

/// Normalizes AND expressions by flattening nested ANDs and reordering by priority.
fn optimize_and(parts: Vec<QueryExpression>) -> QueryExpression {
    let mut flattened = Vec::new();

    for expr in parts.into_iter().map(optimize_expression) {
        match expr {
            QueryExpression::And(nested) => flattened.extend(nested),
            other => flattened.push(other),
        }
    }

    if flattened.len() == 1 {
        return flattened.remove(0);
    }
    reorder_by_priority(&mut flattened);
    QueryExpression::And(flattened)
}

/// Normalizes OR expressions by flattening nested ORs.
fn optimize_or(parts: Vec<QueryExpression>) -> QueryExpression {
    let mut flattened = Vec::new();

    for expr in parts.into_iter().map(optimize_expression) {
        match expr {
            QueryExpression::Or(nested) => flattened.extend(nested),
            other => flattened.push(other),
        }
    }

    if flattened.len() == 1 {
        return flattened.remove(0);
    }
    QueryExpression::Or(flattened)
}

/// Reorders conjunction operands so the cheapest, most selective run first.
///
/// Priority levels (lower executes first):
/// - 0: Related-field lookups (`author:`, `tag:`, `metatype:`)
/// - 1: Free-text terms
/// - 2: Nested disjunctions
/// - 3: Negations, applied as set differences against the running result
fn reorder_by_priority(parts: &mut Vec<QueryExpression>) {
    if parts.len() <= 1 {
        return;
    }

    let priority = |expr: &QueryExpression| -> u8 {
        match expr {
            QueryExpression::Term(QueryTerm::Field { .. }) => 0,
            QueryExpression::Term(QueryTerm::Text(_)) => 1,
            QueryExpression::Not(_) => 3,
            _ => 2,
        }
    };

    let mut keyed: Vec<_> = parts
        .drain(..)
        .map(|expr| (priority(&expr), expr))
        .collect();
    keyed.sort_by_key(|(prio, _)| *prio);
    parts.extend(keyed.into_iter().map(|(_, expr)| expr));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::WildcardPattern;
    use crate::types::RelatedField;

    fn text(s: &str) -> QueryExpression {
        QueryExpression::text(WildcardPattern::parse(s))
    }

    fn tag(t: &str) -> QueryExpression {
        QueryExpression::field(RelatedField::Tag, WildcardPattern::parse(t))
    }

    fn not(inner: QueryExpression) -> QueryExpression {
        QueryExpression::negate(inner)
    }

    #[test]
    fn flatten_nested_and() {
        // (a AND (b AND c)) -> (a AND b AND c)
        let expr = QueryExpression::And(vec![
            text("a"),
            QueryExpression::And(vec![text("b"), text("c")]),
        ]);
        let optimized = optimize_expression(expr);

        match optimized {
            QueryExpression::And(parts) => {
                assert_eq!(parts.len(), 3);
            }
            _ => panic!("Expected And"),
        }
    }

    #[test]
    fn flatten_nested_or_through_groups() {
        // (a OR ((b OR c))) -> (a OR b OR c)
        let expr = QueryExpression::Or(vec![
            text("a"),
            QueryExpression::group(QueryExpression::Or(vec![text("b"), text("c")])),
        ]);
        let optimized = optimize_expression(expr);

        match optimized {
            QueryExpression::Or(parts) => {
                assert_eq!(parts.len(), 3);
            }
            _ => panic!("Expected Or"),
        }
    }

    #[test]
    fn unwrap_single_item_and() {
        let expr = QueryExpression::And(vec![QueryExpression::group(text("alone"))]);
        assert_eq!(optimize_expression(expr), text("alone"));
    }

    #[test]
    fn empty_and_is_preserved() {
        let expr = QueryExpression::And(vec![]);
        assert!(optimize_expression(expr).is_empty());
    }

    #[test]
    fn double_negation_cancels_through_group() {
        // -(-a) -> a
        let expr = not(QueryExpression::group(not(text("a"))));
        assert_eq!(optimize_expression(expr), text("a"));
    }

    #[test]
    fn single_negation_is_kept() {
        let expr = not(QueryExpression::group(text("a")));
        assert_eq!(optimize_expression(expr), not(text("a")));
    }

    #[test]
    fn reorder_fields_first_and_negations_last() {
        // -x content tag:custom -> tag:custom content -x
        let expr = QueryExpression::And(vec![not(text("x")), text("content"), tag("custom")]);
        let optimized = optimize_expression(expr);

        match optimized {
            QueryExpression::And(parts) => {
                assert_eq!(parts, vec![tag("custom"), text("content"), not(text("x"))]);
            }
            _ => panic!("Expected And"),
        }
    }

    #[test]
    fn reorder_is_stable_within_priority() {
        let expr = QueryExpression::And(vec![text("b"), text("a")]);
        assert_eq!(
            optimize_expression(expr),
            QueryExpression::And(vec![text("b"), text("a")])
        );
    }

    #[test]
    fn optimize_not_expression() {
        // NOT (a AND (b AND c)) -> NOT (a AND b AND c)
        let inner = QueryExpression::And(vec![
            text("a"),
            QueryExpression::And(vec![text("b"), text("c")]),
        ]);
        let optimized = optimize_expression(not(inner));

        match optimized {
            QueryExpression::Not(inner) => match *inner {
                QueryExpression::And(parts) => {
                    assert_eq!(parts.len(), 3);
                }
                _ => panic!("Expected And inside Not"),
            },
            _ => panic!("Expected Not"),
        }
    }
}
