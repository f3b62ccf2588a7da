//! Storage layer
//!
//! Two independent JSON documents live in the data directory:
//!
//! - `links.json`: the ordered link list ([`RecordStore`])
//! - `config.json`: the configuration document ([`ConfigStore`])
//!
//! Neither is cached. Every operation loads the whole document, changes it
//! in memory, and saves the whole document back.

pub mod config_doc;
pub mod persistence;
pub mod records;

pub use config_doc::{migrate, ConfigStore, JsonConfigStore};
pub use records::{JsonRecordStore, RecordStore};
