//! Search engine registry
//!
//! Manages `search.engines` and `search.engine` inside the configuration
//! document. Names are unique ignoring case: `upsert` and `remove` match
//! case-insensitively. Activation is stricter and requires the exact stored
//! name, and removing the active engine clears the selection only when the
//! active name matches exactly.

use tracing::info;

use crate::error::{HubError, HubResult};
use crate::models::SearchEngine;
use crate::storage::ConfigStore;

/// CRUD over the search engines of a [`ConfigStore`]
pub struct EngineRegistry<S> {
    store: S,
}

impl<S: ConfigStore> EngineRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Engines in stored order
    pub fn list(&self) -> HubResult<Vec<SearchEngine>> {
        Ok(self.store.load()?.search.engines)
    }

    /// The active engine, if one is selected and still registered
    pub fn active(&self) -> HubResult<Option<SearchEngine>> {
        Ok(self.store.load()?.search.active().cloned())
    }

    /// Add an engine, or update url and logo of the one with the same name
    ///
    /// An existing engine keeps its position and the casing of its name.
    pub fn upsert(&self, name: &str, url: &str, logo: &str) -> HubResult<()> {
        require("name", name)?;
        require("url", url)?;
        require("logo", logo)?;

        let mut doc = self.store.load()?;
        match doc.search.engines.iter_mut().find(|e| e.matches(name)) {
            Some(existing) => {
                existing.url = url.to_string();
                existing.logo = logo.to_string();
                info!(engine = %existing.name, "Updated search engine");
            }
            None => {
                doc.search
                    .engines
                    .push(SearchEngine::new(name, url, logo));
                info!(engine = %name, "Added search engine");
            }
        }
        self.store.save(&doc)
    }

    /// Remove every engine whose name matches ignoring case
    ///
    /// Removing an unknown name succeeds and leaves the list unchanged.
    pub fn remove(&self, name: &str) -> HubResult<()> {
        let mut doc = self.store.load()?;
        let before = doc.search.engines.len();
        doc.search.engines.retain(|e| !e.matches(name));

        if doc.search.engine == name {
            doc.search.engine.clear();
            info!(engine = %name, "Cleared active search engine");
        }
        if doc.search.engines.len() != before {
            info!(engine = %name, "Removed search engine");
        }
        self.store.save(&doc)
    }

    /// Select the engine used by the front page
    ///
    /// `name` must match a registered engine exactly, including case.
    pub fn set_active(&self, name: &str) -> HubResult<()> {
        let mut doc = self.store.load()?;
        if !doc.search.engines.iter().any(|e| e.name == name) {
            return Err(HubError::EngineNotFound {
                name: name.to_string(),
            });
        }

        doc.search.engine = name.to_string();
        info!(engine = %name, "Activated search engine");
        self.store.save(&doc)
    }
}

fn require(field: &'static str, value: &str) -> HubResult<()> {
    if value.is_empty() {
        return Err(HubError::MissingField { field });
    }
    Ok(())
}
