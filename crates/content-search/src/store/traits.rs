use crate::query::WildcardPattern;
use crate::types::{IdSet, RelatedField, ResultSet, TextField};

use super::scope::PublishedScope;

/// Read-only record lookups used by the query evaluator.
///
/// Every method returns ids already confined to `scope`; the evaluator never
/// applies publication rules itself. Results are ordered by the store's
/// canonical ordering (newest creation date first).
pub trait RecordStore {
    /// Records whose text in any of `fields` matches `pattern`.
    fn filter_by_text_contains(
        &self,
        fields: &[TextField],
        pattern: &WildcardPattern,
        scope: &PublishedScope,
    ) -> ResultSet;

    /// Records with at least one related value on `field` matching `pattern`.
    fn filter_by_related(
        &self,
        field: RelatedField,
        pattern: &WildcardPattern,
        scope: &PublishedScope,
    ) -> ResultSet;

    /// Every record in scope.
    fn all_ids(&self, scope: &PublishedScope) -> ResultSet;

    /// Orders an id set canonically. Ids unknown to the store are dropped.
    fn order(&self, ids: &IdSet) -> ResultSet;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn filter_by_text_contains(
        &self,
        fields: &[TextField],
        pattern: &WildcardPattern,
        scope: &PublishedScope,
    ) -> ResultSet {
        (**self).filter_by_text_contains(fields, pattern, scope)
    }

    fn filter_by_related(
        &self,
        field: RelatedField,
        pattern: &WildcardPattern,
        scope: &PublishedScope,
    ) -> ResultSet {
        (**self).filter_by_related(field, pattern, scope)
    }

    fn all_ids(&self, scope: &PublishedScope) -> ResultSet {
        (**self).all_ids(scope)
    }

    fn order(&self, ids: &IdSet) -> ResultSet {
        (**self).order(ids)
    }
}
