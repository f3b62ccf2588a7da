//! Application settings command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use linkhub_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current settings
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "bind": config.bind,
                    "static_dir": config.static_dir(),
                    "log_level": config.log_level,
                    "admin_password_set": !config.uses_default_admin_password()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:   {}", config.data_dir.display());
            println!("  bind:       {}", config.bind);
            println!("  static_dir: {}", config.static_dir().display());
            println!("  log_level:  {}", config.log_level);
            println!(
                "  admin_password: {}",
                if config.uses_default_admin_password() {
                    "(default)"
                } else {
                    "(set)"
                }
            );
            println!();
            println!("Links:         {}", config.links_path().display());
            println!("Search config: {}", config.config_doc_path().display());
            println!("Config file:   {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a settings value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "bind" => {
            value
                .parse::<std::net::SocketAddr>()
                .with_context(|| format!("Invalid bind address '{}'. Use host:port.", value))?;
            config.bind = value.clone();
        }
        "static_dir" => {
            config.static_dir = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone().into())
            };
        }
        "log_level" => {
            if !matches!(
                value.as_str(),
                "trace" | "debug" | "info" | "warn" | "error" | "off"
            ) {
                bail!(
                    "Invalid log level '{}'. Use trace, debug, info, warn, error or off.",
                    value
                );
            }
            config.log_level = value.clone();
        }
        "admin_password" => {
            if value.is_empty() {
                bail!("Admin password cannot be empty");
            }
            config.admin_password = Some(value.clone());
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, bind, static_dir, log_level, admin_password",
                key
            );
        }
    }

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    if key == "admin_password" {
        output.success("Admin password updated");
    } else {
        output.success(&format!("Set {} = {}", key, value));
    }

    Ok(())
}
