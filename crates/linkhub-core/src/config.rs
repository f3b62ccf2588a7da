//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/linkhub/config.toml)
//! 3. Environment variables (LINKHUB_* prefix)
//!
//! Environment variables take precedence over config file values.
//!
//! This is the server's own configuration (where data lives, what to bind).
//! The search engine settings served to clients are a separate document,
//! see [`crate::storage::ConfigStore`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "LINKHUB";

/// Default listen address
pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

/// Admin password used when none is configured
pub const DEFAULT_ADMIN_PASSWORD: &str = "changeme";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding links.json and config.json
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Address the HTTP server listens on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Directory for static assets (defaults to `<data_dir>/static`)
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Log level for linkhub targets
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Shared password for the admin page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bind: default_bind(),
            static_dir: None,
            log_level: default_log_level(),
            admin_password: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_BIND", ENV_PREFIX)) {
            if !val.is_empty() {
                self.bind = val;
            }
        }

        // Empty string clears it
        if let Ok(val) = std::env::var(format!("{}_STATIC_DIR", ENV_PREFIX)) {
            self.static_dir = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        if let Ok(val) = std::env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.log_level = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_ADMIN_PASSWORD", ENV_PREFIX)) {
            if !val.is_empty() {
                self.admin_password = Some(val);
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with LINKHUB_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("linkhub")
            .join("config.toml")
    }

    /// Get the path to the link list
    pub fn links_path(&self) -> PathBuf {
        self.data_dir.join("links.json")
    }

    /// Get the path to the search configuration document
    pub fn config_doc_path(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    /// Get the static asset directory
    pub fn static_dir(&self) -> PathBuf {
        self.static_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("static"))
    }

    /// The admin password, falling back to [`DEFAULT_ADMIN_PASSWORD`]
    pub fn admin_password(&self) -> &str {
        self.admin_password
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_PASSWORD)
    }

    /// Whether the admin password is still the built-in default
    pub fn uses_default_admin_password(&self) -> bool {
        self.admin_password.is_none()
    }

    /// Get the directory uploaded images are stored in
    pub fn images_dir(&self) -> PathBuf {
        self.static_dir().join("images")
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("linkhub")
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "LINKHUB_DATA_DIR",
        "LINKHUB_BIND",
        "LINKHUB_STATIC_DIR",
        "LINKHUB_LOG_LEVEL",
        "LINKHUB_ADMIN_PASSWORD",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bind, "0.0.0.0:5000");
        assert_eq!(config.log_level, "info");
        assert!(config.static_dir.is_none());
        assert!(config.data_dir.ends_with("linkhub"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config {
            data_dir: PathBuf::from("/srv/linkhub"),
            ..Config::default()
        };

        assert_eq!(config.links_path(), PathBuf::from("/srv/linkhub/links.json"));
        assert_eq!(
            config.config_doc_path(),
            PathBuf::from("/srv/linkhub/config.json")
        );
        assert_eq!(
            config.images_dir(),
            PathBuf::from("/srv/linkhub/static/images")
        );
    }

    #[test]
    fn test_static_dir_override() {
        let config = Config {
            static_dir: Some(PathBuf::from("/var/www")),
            ..Config::default()
        };
        assert_eq!(config.images_dir(), PathBuf::from("/var/www/images"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("LINKHUB_DATA_DIR", "/tmp/linkhub-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/linkhub-test"));
    }

    #[test]
    fn test_env_override_bind_and_log_level() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("LINKHUB_BIND", "127.0.0.1:8080");
        env::set_var("LINKHUB_LOG_LEVEL", "debug");
        config.apply_env_overrides();
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.log_level, "debug");

        // Empty values keep the current setting
        env::set_var("LINKHUB_BIND", "");
        config.apply_env_overrides();
        assert_eq!(config.bind, "127.0.0.1:8080");
    }

    #[test]
    fn test_env_override_static_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("LINKHUB_STATIC_DIR", "/var/www");
        config.apply_env_overrides();
        assert_eq!(config.static_dir, Some(PathBuf::from("/var/www")));

        env::set_var("LINKHUB_STATIC_DIR", "");
        config.apply_env_overrides();
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_admin_password_default_and_env() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        assert_eq!(config.admin_password(), DEFAULT_ADMIN_PASSWORD);
        assert!(config.uses_default_admin_password());

        env::set_var("LINKHUB_ADMIN_PASSWORD", "hunter2");
        config.apply_env_overrides();
        assert_eq!(config.admin_password(), "hunter2");
        assert!(!config.uses_default_admin_password());
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            bind = "127.0.0.1:9000"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_save_and_load_from_path() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            bind: "127.0.0.1:5001".to_string(),
            static_dir: Some(temp_dir.path().join("static")),
            log_level: "warn".to_string(),
            admin_password: Some("s3cret".to_string()),
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.bind, config.bind);
        assert_eq!(loaded.static_dir, config.static_dir);
        assert_eq!(loaded.log_level, config.log_level);
        assert_eq!(loaded.admin_password(), "s3cret");
        // Data directory is created on load
        assert!(config.data_dir.exists());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        env::set_var("LINKHUB_DATA_DIR", temp_dir.path());

        let path = temp_dir.path().join("missing.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.data_dir, temp_dir.path());
    }
}
