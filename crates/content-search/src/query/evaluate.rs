//! Query evaluation against a record store.
//!
//! Leaves become store lookups; boolean nodes combine the returned id sets.

use std::cell::OnceCell;

use crate::store::{PublishedScope, RecordStore};
use crate::types::{IdSet, TextField};

use super::expression::{QueryExpression, QueryTerm};

/// Per-evaluation state: the store, the scope, and the lazily fetched
/// scope-wide id set used by negation.
pub struct EvaluationContext<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    scope: &'a PublishedScope,
    text_fields: &'a [TextField],
    all_ids: OnceCell<IdSet>,
}

impl<'a, S: RecordStore + ?Sized> EvaluationContext<'a, S> {
    pub fn new(store: &'a S, scope: &'a PublishedScope, text_fields: &'a [TextField]) -> Self {
        Self {
            store,
            scope,
            text_fields,
            all_ids: OnceCell::new(),
        }
    }

    fn all_ids(&self) -> &IdSet {
        self.all_ids
            .get_or_init(|| self.store.all_ids(self.scope).to_id_set())
    }
}

/// Evaluates an expression into an unordered id set.
///
/// An empty conjunction or disjunction (blank query) matches nothing.
pub fn evaluate_expression<S: RecordStore + ?Sized>(
    expression: &QueryExpression,
    context: &EvaluationContext<'_, S>,
) -> IdSet {
    match expression {
        QueryExpression::Term(term) => evaluate_query_term(term, context),
        QueryExpression::Group(inner) => evaluate_expression(inner, context),
        QueryExpression::Not(inner) => {
            let excluded = evaluate_expression(inner, context);
            context
                .all_ids()
                .iter()
                .filter(|id| !excluded.contains(id))
                .copied()
                .collect()
        }
        QueryExpression::And(parts) => evaluate_conjunction(parts, context),
        QueryExpression::Or(parts) => {
            let mut matched = IdSet::default();
            for part in parts {
                matched.extend(evaluate_expression(part, context));
            }
            matched
        }
    }
}

/// Intersects positive operands first, then subtracts negated ones.
///
/// Stops as soon as the running intersection is empty.
fn evaluate_conjunction<S: RecordStore + ?Sized>(
    parts: &[QueryExpression],
    context: &EvaluationContext<'_, S>,
) -> IdSet {
    if parts.is_empty() {
        return IdSet::default();
    }

    let (negated, positive): (Vec<_>, Vec<_>) = parts
        .iter()
        .partition(|part| matches!(part, QueryExpression::Not(_)));

    let mut matched: Option<IdSet> = None;
    for part in positive {
        let ids = evaluate_expression(part, context);
        let next = match matched {
            None => ids,
            Some(current) => current.into_iter().filter(|id| ids.contains(id)).collect(),
        };
        if next.is_empty() {
            return next;
        }
        matched = Some(next);
    }

    let mut matched = matched.unwrap_or_else(|| context.all_ids().clone());
    for part in negated {
        let QueryExpression::Not(inner) = part else {
            continue;
        };
        let excluded = evaluate_expression(inner, context);
        matched.retain(|id| !excluded.contains(id));
        if matched.is_empty() {
            break;
        }
    }
    matched
}

fn evaluate_query_term<S: RecordStore + ?Sized>(
    term: &QueryTerm,
    context: &EvaluationContext<'_, S>,
) -> IdSet {
    let results = match term {
        QueryTerm::Text(pattern) => {
            context
                .store
                .filter_by_text_contains(context.text_fields, pattern, context.scope)
        }
        QueryTerm::Field { field, pattern } => {
            context.store.filter_by_related(*field, pattern, context.scope)
        }
    };
    results.to_id_set()
}
