//! In-memory record store.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::query::WildcardPattern;
use crate::types::{IdSet, Record, RecordId, RelatedField, ResultSet, TextField};

use super::scope::PublishedScope;
use super::traits::RecordStore;

/// Number of published records using a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// A `RecordStore` over an owned list of records.
///
/// Lookups scan the records that fall inside the requested scope.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Inserts a record, replacing any record with the same id.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        match self.records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => {
                self.records.push(record);
                None
            }
        }
    }

    pub fn remove(&mut self, id: RecordId) -> Option<Record> {
        let index = self.records.iter().position(|record| record.id == id)?;
        Some(self.records.remove(index))
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.records.iter_mut().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Published records in canonical order.
    pub fn published_ids(&self, scope: &PublishedScope) -> ResultSet {
        self.collect_ordered(self.published(scope))
    }

    /// Usernames with at least one published record, sorted.
    pub fn published_authors(&self, scope: &PublishedScope) -> Vec<String> {
        let mut authors = self
            .published(scope)
            .flat_map(|record| record.authors.iter().cloned())
            .collect::<Vec<_>>();
        authors.sort();
        authors.dedup();
        authors
    }

    /// Tags used by published records with their usage counts, sorted by name.
    pub fn published_tags(&self, scope: &PublishedScope) -> Vec<TagCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in self.published(scope) {
            for tag in &record.tags {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .map(|(name, count)| TagCount {
                name: name.to_string(),
                count,
            })
            .collect()
    }

    fn published<'a>(&'a self, scope: &'a PublishedScope) -> impl Iterator<Item = &'a Record> {
        self.records.iter().filter(move |record| scope.includes(record))
    }

    fn collect_ordered<'a, I>(&self, records: I) -> ResultSet
    where
        I: Iterator<Item = &'a Record>,
    {
        let mut matched = records.collect::<Vec<_>>();
        matched.sort_by_key(|record| Reverse((record.creation_date, record.id)));
        matched.into_iter().map(|record| record.id).collect()
    }
}

impl RecordStore for MemoryStore {
    fn filter_by_text_contains(
        &self,
        fields: &[TextField],
        pattern: &WildcardPattern,
        scope: &PublishedScope,
    ) -> ResultSet {
        self.collect_ordered(self.published(scope).filter(|record| {
            fields
                .iter()
                .any(|field| pattern.matches_text(record.text(*field)))
        }))
    }

    fn filter_by_related(
        &self,
        field: RelatedField,
        pattern: &WildcardPattern,
        scope: &PublishedScope,
    ) -> ResultSet {
        self.collect_ordered(self.published(scope).filter(|record| {
            record
                .related_values(field)
                .into_iter()
                .any(|value| pattern.matches_value(value))
        }))
    }

    fn all_ids(&self, scope: &PublishedScope) -> ResultSet {
        self.published_ids(scope)
    }

    fn order(&self, ids: &IdSet) -> ResultSet {
        self.collect_ordered(self.records.iter().filter(|record| ids.contains(&record.id)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::{Metatype, Status};

    fn scope() -> PublishedScope {
        PublishedScope::new("example.com", Utc.with_ymd_and_hms(2010, 6, 1, 0, 0, 0).unwrap())
    }

    fn record(id: u64, day: u32) -> Record {
        Record::new(id, format!("My nodetype {id}"), format!("My content {id}"))
            .with_status(Status::Published)
            .with_sites(["example.com"])
            .with_creation_date(Utc.with_ymd_and_hms(2010, 1, day, 0, 0, 0).unwrap())
    }

    fn store() -> MemoryStore {
        MemoryStore::with_records([
            record(1, 1)
                .with_authors(["webmaster"])
                .with_tag_list("gstudio, test")
                .with_metatypes([Metatype::new("Metatype 1", "metatype-1")]),
            record(2, 2)
                .with_authors(["webmaster", "contributor"])
                .with_tag_list("gstudio"),
            record(3, 3)
                .with_authors(["ghost"])
                .with_tag_list("draft")
                .with_status(Status::Draft),
        ])
    }

    fn ids(raw: &[u64]) -> Vec<RecordId> {
        raw.iter().copied().map(RecordId).collect()
    }

    #[test]
    fn published_ids_are_newest_first() {
        assert_eq!(store().published_ids(&scope()).into_vec(), ids(&[2, 1]));
    }

    #[test]
    fn ties_on_creation_date_fall_back_to_id() {
        let store = MemoryStore::with_records([record(1, 5), record(7, 5), record(4, 5)]);
        assert_eq!(store.published_ids(&scope()).into_vec(), ids(&[7, 4, 1]));
    }

    #[test]
    fn insert_replaces_existing_id() {
        let mut store = store();
        let previous = store.insert(record(1, 9).with_status(Status::Hidden));
        assert!(previous.is_some());
        assert_eq!(store.len(), 3);
        assert_eq!(store.published_ids(&scope()).into_vec(), ids(&[2]));
    }

    #[test]
    fn text_lookup_checks_requested_fields() {
        let store = store();
        let pattern = WildcardPattern::parse("nodetype");
        assert!(store
            .filter_by_text_contains(&[TextField::Content], &pattern, &scope())
            .is_empty());
        assert_eq!(
            store
                .filter_by_text_contains(&[TextField::Content, TextField::Title], &pattern, &scope())
                .into_vec(),
            ids(&[2, 1])
        );
    }

    #[test]
    fn related_lookup_is_scoped() {
        let store = store();
        let ghost = WildcardPattern::parse("ghost");
        assert!(store
            .filter_by_related(RelatedField::Author, &ghost, &scope())
            .is_empty());
        let contributor = WildcardPattern::parse("Contributor");
        assert_eq!(
            store
                .filter_by_related(RelatedField::Author, &contributor, &scope())
                .into_vec(),
            ids(&[2])
        );
    }

    #[test]
    fn metatype_lookup_matches_title_or_slug() {
        let store = store();
        for value in ["Metatype 1", "metatype-1"] {
            let pattern = WildcardPattern::literal(value);
            assert_eq!(
                store
                    .filter_by_related(RelatedField::Metatype, &pattern, &scope())
                    .into_vec(),
                ids(&[1])
            );
        }
    }

    #[test]
    fn order_drops_unknown_ids() {
        let set: IdSet = ids(&[1, 2, 42]).into_iter().collect();
        assert_eq!(store().order(&set).into_vec(), ids(&[2, 1]));
    }

    #[test]
    fn published_authors_and_tags() {
        let store = store();
        assert_eq!(
            store.published_authors(&scope()),
            vec!["contributor".to_string(), "webmaster".to_string()]
        );
        assert_eq!(
            store.published_tags(&scope()),
            vec![
                TagCount {
                    name: "gstudio".to_string(),
                    count: 2
                },
                TagCount {
                    name: "test".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn leaving_the_site_unpublishes() {
        let mut store = store();
        if let Some(record) = store.get_mut(RecordId(2)) {
            record.sites = vec!["domain.com".to_string()];
        }
        assert_eq!(store.published_ids(&scope()).into_vec(), ids(&[1]));
        assert_eq!(store.published_authors(&scope()), vec!["webmaster".to_string()]);
    }
}
