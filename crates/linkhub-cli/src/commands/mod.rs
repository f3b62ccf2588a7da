//! Command handlers

pub mod engine;
pub mod link;
pub mod settings;
