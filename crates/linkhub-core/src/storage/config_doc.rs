//! Configuration document persistence and migration
//!
//! Older versions stored a single search URL (`search.url`) instead of an
//! engine list. Every load normalises whatever is on disk into the current
//! shape:
//!
//! - `search` is an object
//! - `search.engine` is a string (default `"google"`)
//! - `search.engines` is an array (default `[]`) of objects with a string
//!   `name`; missing `url`/`logo` are filled with `""`
//! - `search.url` is gone
//!
//! Normalisation works field by field: an engine entry that cannot be used
//! is dropped on its own, and every other section and key is kept.
//!
//! The migrated document is only written back when a caller saves it.
//! A missing or unreadable-as-JSON file yields the default document.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::persistence::{read_if_exists, write_json};
use crate::config::Config;
use crate::error::{HubError, HubResult};
use crate::models::{ConfigDocument, DEFAULT_ENGINE};

/// Load/save access to the configuration document
pub trait ConfigStore {
    /// The persisted document, migrated to the current shape
    fn load(&self) -> HubResult<ConfigDocument>;

    /// Replace the persisted document
    fn save(&self, doc: &ConfigDocument) -> HubResult<()>;
}

/// Configuration document stored as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured document path
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.config_doc_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonConfigStore {
    fn load(&self) -> HubResult<ConfigDocument> {
        let raw = match read_if_exists(&self.path)? {
            Some(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => value,
                Err(e) => {
                    warn!(path = ?self.path, error = %e, "Config document unparsable, using defaults");
                    default_document()
                }
            },
            None => {
                debug!(path = ?self.path, "No config document, using defaults");
                default_document()
            }
        };

        serde_json::from_value(migrate(raw)).map_err(|e| HubError::Malformed {
            path: self.path.clone(),
            details: e.to_string(),
        })
    }

    fn save(&self, doc: &ConfigDocument) -> HubResult<()> {
        write_json(&self.path, doc)?;
        debug!(path = ?self.path, engines = doc.search.engines.len(), "Saved config document");
        Ok(())
    }
}

/// The document used when nothing usable is on disk
pub fn default_document() -> Value {
    serde_json::json!({"search": {"engine": DEFAULT_ENGINE, "engines": []}})
}

/// Bring a raw document into the current shape
pub fn migrate(raw: Value) -> Value {
    let mut root = match raw {
        Value::Object(map) => map,
        _ => return default_document(),
    };

    let search = root
        .entry("search")
        .or_insert_with(|| Value::Object(Map::new()));
    if !search.is_object() {
        warn!(value = %search, "search section is not an object, replacing it");
        *search = Value::Object(Map::new());
    }

    if let Value::Object(search) = search {
        if !matches!(search.get("engine"), Some(Value::String(_))) {
            let previous = search.insert(
                "engine".to_string(),
                Value::String(DEFAULT_ENGINE.to_string()),
            );
            if let Some(previous) = previous {
                warn!(value = %previous, "Active engine is not a string, using default");
            }
        }

        let engines = search
            .entry("engines")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !engines.is_array() {
            warn!(value = %engines, "Engine list is not an array, replacing it");
            *engines = Value::Array(Vec::new());
        }
        if let Value::Array(entries) = engines {
            entries.retain_mut(normalize_engine);
        }

        search.remove("url");
    }

    Value::Object(root)
}

/// Fill in an engine entry, returning false if it cannot be used
fn normalize_engine(entry: &mut Value) -> bool {
    let Some(fields) = entry.as_object_mut() else {
        warn!("Dropping engine entry that is not an object");
        return false;
    };
    let name = match fields.get("name") {
        Some(Value::String(name)) => name.clone(),
        _ => {
            warn!("Dropping engine entry without a name");
            return false;
        }
    };

    for key in ["url", "logo"] {
        match fields.get(key) {
            Some(Value::String(_)) => {}
            None | Some(Value::Null) => {
                fields.insert(key.to_string(), Value::String(String::new()));
            }
            Some(_) => {
                warn!(engine = %name, field = key, "Dropping engine entry with a non-string field");
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchEngine;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> JsonConfigStore {
        JsonConfigStore::new(temp_dir.path().join("config.json"))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let doc = store.load().unwrap();
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"search": {"engine": "google", "engines": []}})
        );
        // Loading does not write
        assert!(!store.path().exists());
    }

    #[test]
    fn test_legacy_url_is_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        fs::write(store.path(), r#"{"search": {"engine": "x", "url": "old"}}"#).unwrap();

        let doc = store.load().unwrap();
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"search": {"engine": "x", "engines": []}})
        );

        // Migration is not persisted by load
        let on_disk = fs::read_to_string(store.path()).unwrap();
        assert!(on_disk.contains("\"url\""));
    }

    #[test]
    fn test_unparsable_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        fs::write(store.path(), "{ not json").unwrap();

        let doc = store.load().unwrap();
        assert_eq!(doc, ConfigDocument::default());
    }

    #[test]
    fn test_bad_active_engine_keeps_everything_else() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        fs::write(
            store.path(),
            r#"{"search": {"engine": null, "engines": [{"name": "Kagi", "url": "https://kagi.com/search?q=", "logo": "k.png"}]}, "title": "My hub"}"#,
        )
        .unwrap();

        let doc = store.load().unwrap();
        assert_eq!(doc.search.engine, "google");
        assert_eq!(
            doc.search.engines,
            vec![SearchEngine::new("Kagi", "https://kagi.com/search?q=", "k.png")]
        );
        assert_eq!(doc.extra.get("title"), Some(&json!("My hub")));
    }

    #[test]
    fn test_unusable_engine_entries_are_dropped_alone() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        fs::write(
            store.path(),
            r#"{"search": {"engine": "Kagi", "engines": [
                {"name": 3},
                "bing",
                {"name": "Bad", "url": 42, "logo": "b.png"},
                {"name": "Kagi", "url": "https://kagi.com/search?q="}
            ]}, "theme": {"dark": true}}"#,
        )
        .unwrap();

        let doc = store.load().unwrap();
        assert_eq!(doc.search.engine, "Kagi");
        assert_eq!(
            doc.search.engines,
            vec![SearchEngine::new("Kagi", "https://kagi.com/search?q=", "")]
        );
        assert_eq!(doc.extra.get("theme"), Some(&json!({"dark": true})));
    }

    #[test]
    fn test_engine_entry_keys_pass_through() {
        let migrated = migrate(json!({"search": {"engines": [
            {"name": "DDG", "url": "https://ddg.gg/?q=", "logo": "d.png", "shortcut": "d"}
        ]}}));

        let doc: ConfigDocument = serde_json::from_value(migrated).unwrap();
        assert_eq!(doc.search.engines[0].extra.get("shortcut"), Some(&json!("d")));
        assert_eq!(
            serde_json::to_value(&doc).unwrap()["search"]["engines"][0]["shortcut"],
            json!("d")
        );
    }

    #[test]
    fn test_load_save_keeps_sections_while_migrating() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        fs::write(
            store.path(),
            r#"{"search": {"engine": "x", "url": "old", "placeholder": "Search..."}, "theme": "dark"}"#,
        )
        .unwrap();

        let doc = store.load().unwrap();
        store.save(&doc).unwrap();

        let on_disk: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            on_disk,
            json!({
                "search": {"engine": "x", "engines": [], "placeholder": "Search..."},
                "theme": "dark"
            })
        );
    }

    #[test]
    fn test_migrate_replaces_non_array_engines() {
        assert_eq!(
            migrate(json!({"search": {"engine": "g", "engines": {"name": "x"}}})),
            json!({"search": {"engine": "g", "engines": []}})
        );
    }

    #[test]
    fn test_migrate_fills_missing_search() {
        assert_eq!(
            migrate(json!({"theme": "dark"})),
            json!({"theme": "dark", "search": {"engine": "google", "engines": []}})
        );
    }

    #[test]
    fn test_migrate_replaces_non_object_search() {
        assert_eq!(
            migrate(json!({"search": "google"})),
            json!({"search": {"engine": "google", "engines": []}})
        );
    }

    #[test]
    fn test_migrate_non_object_root() {
        assert_eq!(migrate(json!([1, 2])), default_document());
    }

    #[test]
    fn test_migrate_keeps_empty_active_engine() {
        let migrated = migrate(json!({"search": {"engine": "", "engines": []}}));
        assert_eq!(migrated["search"]["engine"], json!(""));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let mut doc = store.load().unwrap();
        doc.search
            .engines
            .push(SearchEngine::new("Google", "https://g.com/?q=", "g.png"));
        doc.extra.insert("title".to_string(), json!("My hub"));
        store.save(&doc).unwrap();

        assert_eq!(store.load().unwrap(), doc);
    }
}
