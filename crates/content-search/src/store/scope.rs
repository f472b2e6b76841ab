use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Record, Status};

/// The subset of records eligible for search.
///
/// A record is in scope when it is published, attached to `site`, and `now`
/// falls inside its publication window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedScope {
    site: String,
    now: DateTime<Utc>,
}

impl PublishedScope {
    pub fn new(site: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            site: site.into(),
            now,
        }
    }

    /// Scope for `site` evaluated at the current time.
    pub fn current(site: impl Into<String>) -> Self {
        Self::new(site, Utc::now())
    }

    pub fn site(&self) -> &str {
        self.site.as_str()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn includes(&self, record: &Record) -> bool {
        if record.status != Status::Published {
            return false;
        }
        if !record.sites.iter().any(|site| site == &self.site) {
            return false;
        }
        if record.start_publication.is_some_and(|start| start > self.now) {
            return false;
        }
        // The end bound is exclusive.
        if record.end_publication.is_some_and(|end| end <= self.now) {
            return false;
        }
        true
    }
}
