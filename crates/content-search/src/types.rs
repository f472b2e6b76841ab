//! Core record and result types.
//!
//! Records mirror the publishing platform's nodetype model: free text
//! (title, excerpt, content) plus the related entities the query language
//! can qualify on (authors, tags, metatypes).

use chrono::{DateTime, Utc};
use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};

/// Unordered set of record ids used during boolean evaluation.
pub type IdSet = FnvHashSet<RecordId>;

/// Identifier of a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publication status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Hidden,
    Published,
}

/// A metatype attached to a record. Queries match either form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metatype {
    pub title: String,
    pub slug: String,
}

impl Metatype {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
        }
    }
}

/// Free-text fields searched by unqualified terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    Content,
    Title,
    Excerpt,
}

impl TextField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Title => "title",
            Self::Excerpt => "excerpt",
        }
    }
}

/// Related entities reachable through a `field:value` qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelatedField {
    /// Author username.
    Author,
    /// Tag name.
    Tag,
    /// Metatype title or slug.
    Metatype,
}

impl RelatedField {
    /// Resolves a query qualifier (case-insensitive, singular or plural).
    pub fn from_qualifier(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "author" | "authors" => Some(Self::Author),
            "tag" | "tags" => Some(Self::Tag),
            "metatype" | "metatypes" => Some(Self::Metatype),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Tag => "tag",
            Self::Metatype => "metatype",
        }
    }
}

/// A content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub sites: Vec<String>,
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub start_publication: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_publication: Option<DateTime<Utc>>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metatypes: Vec<Metatype>,
}

impl Record {
    /// Creates a draft record with a slug derived from the title.
    pub fn new(id: u64, title: impl Into<String>, content: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: RecordId(id),
            slug: slugify(&title),
            title,
            content: content.into(),
            excerpt: String::new(),
            status: Status::Draft,
            sites: Vec::new(),
            creation_date: Utc::now(),
            start_publication: None,
            end_publication: None,
            authors: Vec::new(),
            tags: Vec::new(),
            metatypes: Vec::new(),
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_sites<I, T>(mut self, sites: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.sites = sites.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_creation_date(mut self, creation_date: DateTime<Utc>) -> Self {
        self.creation_date = creation_date;
        self
    }

    pub fn with_publication_window(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_publication = start;
        self.end_publication = end;
        self
    }

    pub fn with_authors<I, T>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Sets tags from a comma-separated list such as `"gstudio, test"`.
    pub fn with_tag_list(mut self, raw: &str) -> Self {
        self.tags = parse_tag_list(raw);
        self
    }

    pub fn with_metatypes<I>(mut self, metatypes: I) -> Self
    where
        I: IntoIterator<Item = Metatype>,
    {
        self.metatypes = metatypes.into_iter().collect();
        self
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Content => self.content.as_str(),
            TextField::Title => self.title.as_str(),
            TextField::Excerpt => self.excerpt.as_str(),
        }
    }

    /// Returns every stored value a qualifier on `field` may match.
    ///
    /// Metatypes contribute both their title and their slug.
    pub fn related_values(&self, field: RelatedField) -> Vec<&str> {
        match field {
            RelatedField::Author => self.authors.iter().map(String::as_str).collect(),
            RelatedField::Tag => self.tags.iter().map(String::as_str).collect(),
            RelatedField::Metatype => self
                .metatypes
                .iter()
                .flat_map(|metatype| [metatype.title.as_str(), metatype.slug.as_str()])
                .collect(),
        }
    }
}

/// Splits a comma-separated tag list, dropping blanks and duplicates.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Lowercases and hyphenates a title into a slug.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Ordered, duplicate-free sequence of record ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    ids: Vec<RecordId>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[RecordId] {
        self.ids.as_slice()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecordId> {
        self.ids.iter()
    }

    pub fn to_id_set(&self) -> IdSet {
        self.ids.iter().copied().collect()
    }

    pub fn into_vec(self) -> Vec<RecordId> {
        self.ids
    }
}

impl FromIterator<RecordId> for ResultSet {
    /// Collects ids in iteration order, keeping the first occurrence of each.
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        let mut seen = IdSet::default();
        let ids = iter.into_iter().filter(|id| seen.insert(*id)).collect();
        Self { ids }
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a RecordId;
    type IntoIter = std::slice::Iter<'a, RecordId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifiers_are_case_insensitive_and_accept_plurals() {
        assert_eq!(RelatedField::from_qualifier("AUTHOR"), Some(RelatedField::Author));
        assert_eq!(RelatedField::from_qualifier("tags"), Some(RelatedField::Tag));
        assert_eq!(
            RelatedField::from_qualifier("Metatypes"),
            Some(RelatedField::Metatype)
        );
        assert_eq!(RelatedField::from_qualifier("site"), None);
    }

    #[test]
    fn tag_list_is_trimmed_and_deduplicated() {
        assert_eq!(
            parse_tag_list("gstudio, test,, gstudio ,custom"),
            vec!["gstudio", "test", "custom"]
        );
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("My nodetype 1"), "my-nodetype-1");
        assert_eq!(slugify("  Hello,   World! "), "hello-world");
    }

    #[test]
    fn metatype_values_include_title_and_slug() {
        let record = Record::new(1, "t", "c")
            .with_metatypes([Metatype::new("Metatype 1", "metatype-1")]);
        assert_eq!(
            record.related_values(RelatedField::Metatype),
            vec!["Metatype 1", "metatype-1"]
        );
    }

    #[test]
    fn result_set_keeps_first_occurrence() {
        let set: ResultSet = [RecordId(3), RecordId(1), RecordId(3), RecordId(2)]
            .into_iter()
            .collect();
        assert_eq!(set.ids(), &[RecordId(3), RecordId(1), RecordId(2)]);
    }
}
