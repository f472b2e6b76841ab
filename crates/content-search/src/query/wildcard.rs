//! Wildcard pattern matching.
//!
//! Only leading and trailing `*` are meaningful; they select prefix, suffix
//! or substring matching. A `*` inside the text is a literal character.

// ---------------------------------------------------------------------------
// Pattern types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAnchor {
    /// No wildcard: equality for related values, containment for free text.
    Exact,
    /// `value*`
    Prefix,
    /// `*value`
    Suffix,
    /// `*value*`
    Contains,
}

/// A lowercased search value with its wildcard anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    anchor: MatchAnchor,
    value: String,
}

impl WildcardPattern {
    /// Parses an unquoted value, honouring leading/trailing `*`.
    pub fn parse(raw: &str) -> Self {
        let leading = raw.starts_with('*');
        let trimmed_start = raw.trim_start_matches('*');
        let trailing = trimmed_start.ends_with('*');
        let value = trimmed_start.trim_end_matches('*');

        let anchor = match (leading, trailing) {
            (false, false) => MatchAnchor::Exact,
            (false, true) => MatchAnchor::Prefix,
            (true, false) => MatchAnchor::Suffix,
            (true, true) => MatchAnchor::Contains,
        };
        // A run of stars with no text ("*", "**") leaves nothing to anchor.
        let anchor = if value.is_empty() && leading {
            MatchAnchor::Contains
        } else {
            anchor
        };

        Self {
            anchor,
            value: value.to_lowercase(),
        }
    }

    /// Builds a pattern from quoted text; stars are taken literally.
    pub fn literal(raw: &str) -> Self {
        Self {
            anchor: MatchAnchor::Exact,
            value: raw.to_lowercase(),
        }
    }

    pub fn anchor(&self) -> MatchAnchor {
        self.anchor
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Matches a single related value (username, tag name, metatype title or slug).
    ///
    /// Exact patterns compare case-insensitively for equality.
    pub fn matches_value(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        match self.anchor {
            MatchAnchor::Exact => candidate == self.value,
            MatchAnchor::Prefix => candidate.starts_with(self.value.as_str()),
            MatchAnchor::Suffix => candidate.ends_with(self.value.as_str()),
            MatchAnchor::Contains => candidate.contains(self.value.as_str()),
        }
    }

    /// Matches a free-text field.
    ///
    /// Exact and contains patterns test substring containment over the whole
    /// text; prefix and suffix patterns apply to individual words.
    pub fn matches_text(&self, text: &str) -> bool {
        if self.value.is_empty() {
            return true;
        }
        let text = text.to_lowercase();
        match self.anchor {
            MatchAnchor::Exact | MatchAnchor::Contains => text.contains(self.value.as_str()),
            MatchAnchor::Prefix => words(text.as_str()).any(|word| {
                word.starts_with(self.value.as_str())
                    || trim_word(word).starts_with(self.value.as_str())
            }),
            MatchAnchor::Suffix => words(text.as_str()).any(|word| {
                word.ends_with(self.value.as_str())
                    || trim_word(word).ends_with(self.value.as_str())
            }),
        }
    }
}

impl std::fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.anchor {
            MatchAnchor::Exact => write!(f, "{}", self.value),
            MatchAnchor::Prefix => write!(f, "{}*", self.value),
            MatchAnchor::Suffix => write!(f, "*{}", self.value),
            MatchAnchor::Contains => write!(f, "*{}*", self.value),
        }
    }
}

// ---------------------------------------------------------------------------
// Word helpers
// ---------------------------------------------------------------------------

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Strips surrounding punctuation so `webmaster.` still ends with `master`.
fn trim_word(word: &str) -> &str {
    word.trim_matches(|ch: char| !ch.is_alphanumeric())
}
