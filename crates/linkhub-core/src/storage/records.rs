//! Link record persistence
//!
//! The link list is a single JSON array. A missing file is an empty list;
//! a file that exists but does not hold a JSON array is reported as
//! malformed and left untouched.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use super::persistence::{read_if_exists, write_json};
use crate::config::Config;
use crate::error::{HubError, HubResult};
use crate::models::Document;

/// Load/save access to the ordered link list
pub trait RecordStore {
    /// The persisted sequence, empty if nothing has been saved yet
    fn load(&self) -> HubResult<Vec<Document>>;

    /// Replace the persisted sequence
    fn save(&self, records: &[Document]) -> HubResult<()>;
}

/// Link list stored as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured links path
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.links_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonRecordStore {
    fn load(&self) -> HubResult<Vec<Document>> {
        let Some(bytes) = read_if_exists(&self.path)? else {
            debug!(path = ?self.path, "No links file, starting empty");
            return Ok(Vec::new());
        };

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| HubError::Malformed {
            path: self.path.clone(),
            details: e.to_string(),
        })?;

        match value {
            Value::Array(records) => {
                debug!(path = ?self.path, count = records.len(), "Loaded links");
                Ok(records)
            }
            other => Err(HubError::Malformed {
                path: self.path.clone(),
                details: format!("expected a JSON array, found {}", json_type(&other)),
            }),
        }
    }

    fn save(&self, records: &[Document]) -> HubResult<()> {
        write_json(&self.path, records)?;
        debug!(path = ?self.path, count = records.len(), "Saved links");
        Ok(())
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
