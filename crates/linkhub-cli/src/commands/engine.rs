//! Search engine command handlers

use anyhow::{Context, Result};

use linkhub_core::{ConfigStore, EngineRegistry, JsonConfigStore};

use crate::output::Output;

/// List engines and the active selection
pub fn list(registry: &EngineRegistry<JsonConfigStore>, output: &Output) -> Result<()> {
    let doc = registry
        .store()
        .load()
        .context("Failed to load search configuration")?;
    let active = registry
        .active()
        .context("Failed to load search configuration")?;
    output.print_engines(&doc.search.engines, &doc.search.engine, active.as_ref());
    Ok(())
}

/// Add an engine or update the one with the same name
pub fn set(
    registry: &EngineRegistry<JsonConfigStore>,
    name: String,
    url: String,
    logo: String,
    output: &Output,
) -> Result<()> {
    registry
        .upsert(&name, &url, &logo)
        .context("Failed to save search engine")?;
    output.success(&format!("Saved search engine: {}", name));
    Ok(())
}

/// Remove an engine
pub fn remove(
    registry: &EngineRegistry<JsonConfigStore>,
    name: String,
    output: &Output,
) -> Result<()> {
    registry
        .remove(&name)
        .context("Failed to remove search engine")?;
    output.success(&format!("Removed search engine: {}", name));
    Ok(())
}

/// Select the active engine
pub fn activate(
    registry: &EngineRegistry<JsonConfigStore>,
    name: String,
    output: &Output,
) -> Result<()> {
    registry
        .set_active(&name)
        .with_context(|| format!("Failed to activate '{}' (names are case-sensitive)", name))?;
    output.success(&format!("Active search engine: {}", name));
    Ok(())
}
