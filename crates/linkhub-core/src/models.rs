//! Data models for linkhub
//!
//! Link records are schema-free JSON documents so arbitrary client fields
//! (title, url, image, ...) pass through untouched. The configuration
//! document is typed only where the search engine registry needs it; any
//! other section is carried along as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A schema-free link record
pub type Document = Value;

/// Engine activated when no configuration has been saved yet
pub const DEFAULT_ENGINE: &str = "google";

/// A search engine entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchEngine {
    /// Display name, unique ignoring case
    pub name: String,
    /// Query URL template
    pub url: String,
    /// Logo path or URL
    pub logo: String,
    /// Unrecognised keys, preserved on save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchEngine {
    pub fn new(name: impl Into<String>, url: impl Into<String>, logo: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            logo: logo.into(),
            extra: Map::new(),
        }
    }

    /// Case-insensitive name comparison
    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// The `search` section of the configuration document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Name of the active engine, empty when none is active
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Registered engines in display order
    #[serde(default)]
    pub engines: Vec<SearchEngine>,
    /// Unrecognised keys, preserved on save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            engines: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl SearchConfig {
    /// Find an engine by case-insensitive name
    pub fn find(&self, name: &str) -> Option<&SearchEngine> {
        self.engines.iter().find(|e| e.matches(name))
    }

    /// The engine named by `engine`, compared exactly
    pub fn active(&self) -> Option<&SearchEngine> {
        if self.engine.is_empty() {
            return None;
        }
        self.engines.iter().find(|e| e.name == self.engine)
    }
}

/// Top-level configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigDocument {
    #[serde(default)]
    pub search: SearchConfig,
    /// Other sections, passed through as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_engine() -> String {
    DEFAULT_ENGINE.to_string()
}
