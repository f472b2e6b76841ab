use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::types::TextField;

pub const SEARCH_CONFIG_FILENAME: &str = "search.json";
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 1024;

/// Search settings, usually loaded from `search.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fields matched by unqualified terms in advanced search.
    pub text_fields: Vec<TextField>,
    /// Fields matched by basic search.
    pub basic_text_fields: Vec<TextField>,
    /// Longer queries are truncated, not rejected.
    pub max_query_length: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            text_fields: vec![TextField::Content],
            basic_text_fields: vec![TextField::Content, TextField::Excerpt, TextField::Title],
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
        }
    }
}

impl SearchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SearchError::ConfigNotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(SearchError::ConfigNotFound(_)) => Self::default(),
            Err(error) => {
                log::warn!(
                    "search config {} unusable, using defaults: {}",
                    path.display(),
                    error
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.text_fields.is_empty() {
            return Err(SearchError::Config(
                "text_fields must name at least one field".to_string(),
            ));
        }
        if self.basic_text_fields.is_empty() {
            return Err(SearchError::Config(
                "basic_text_fields must name at least one field".to_string(),
            ));
        }
        if self.max_query_length == 0 {
            return Err(SearchError::Config(
                "max_query_length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
