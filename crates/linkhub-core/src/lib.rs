//! linkhub Core Library
//!
//! This crate provides the core functionality for linkhub, a personal link
//! hub: an ordered list of links plus a registry of search engines, both
//! persisted as JSON documents in a data directory.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let links = LinkService::new(JsonRecordStore::from_config(&config));
//! let engines = EngineRegistry::new(JsonConfigStore::from_config(&config));
//!
//! links.append(json!({"title": "Rust", "url": "https://rust-lang.org"}))?;
//! links.move_link(3, Direction::Up)?;
//!
//! engines.upsert("Google", "https://www.google.com/search?q=", "images/google.png")?;
//! engines.set_active("Google")?;
//! ```
//!
//! # Modules
//!
//! - `links`: positional CRUD and reordering of links
//! - `registry`: search engine registry and active engine selection
//! - `storage`: JSON document stores and config document migration
//! - `models`: link documents, search engines, configuration document
//! - `error`: error type and categories
//! - `config`: application configuration

pub mod config;
pub mod error;
pub mod links;
pub mod models;
pub mod registry;
pub mod storage;

pub use config::Config;
pub use error::{ErrorKind, HubError, HubResult};
pub use links::{Direction, LinkService};
pub use models::{ConfigDocument, Document, SearchConfig, SearchEngine};
pub use registry::EngineRegistry;
pub use storage::{ConfigStore, JsonConfigStore, JsonRecordStore, RecordStore};
