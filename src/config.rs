//! Configuration management for the dashboard store
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (metadesk.toml)
//! - Environment variables (METADESK__*)
//!
//! ## Example config file (metadesk.toml):
//! ```toml
//! [store]
//! seed_demo_schemas = true
//! id_scheme = "timestamp"
//!
//! [ui]
//! theme = "dark"
//! toast_ttl_ms = 5000
//!
//! [logging]
//! filter = "metadesk=debug"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ui::Theme;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Presentation settings
    #[serde(default)]
    pub ui: UiConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Load the built-in demo schemas at startup
    #[serde(default = "default_true")]
    pub seed_demo_schemas: bool,

    /// How identifiers are generated
    #[serde(default)]
    pub id_scheme: IdScheme,
}

/// Identifier generation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// `g{millis}` schema ids, `{millis}{suffix}` row ids
    #[default]
    Timestamp,
    /// `g1, g2, ...` counters
    Sequential,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Initial theme
    #[serde(default)]
    pub theme: Theme,

    /// How long a toast stays queued before auto-dismiss
    #[serde(default = "default_toast_ttl_ms")]
    pub toast_ttl_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by RUST_LOG
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_toast_ttl_ms() -> u64 {
    5000
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_demo_schemas: true,
            id_scheme: IdScheme::Timestamp,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            toast_ttl_ms: default_toast_ttl_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl UiConfig {
    pub fn toast_ttl(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::try_from(self.toast_ttl_ms).unwrap_or(i64::MAX))
    }
}

impl DashboardConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, optionally layering a specific file on top
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["metadesk.toml", ".metadesk.toml", "config/metadesk.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "metadesk") {
            let xdg_config = config_dir.config_dir().join("metadesk.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (METADESK__STORE__ID_SCHEME=...)
        builder = builder.add_source(
            Environment::with_prefix("METADESK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert!(config.store.seed_demo_schemas);
        assert_eq!(config.store.id_scheme, IdScheme::Timestamp);
        assert_eq!(config.ui.theme, Theme::System);
        assert_eq!(config.ui.toast_ttl(), chrono::Duration::seconds(5));
    }

    #[test]
    fn test_serialize_config() {
        let config = DashboardConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[ui]"));
        assert!(toml_str.contains("id_scheme = \"timestamp\""));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[store]\nseed_demo_schemas = false\nid_scheme = \"sequential\"\n\n\
             [ui]\ntheme = \"dark\"\n",
        )
        .unwrap();

        let config = DashboardConfig::load_from(path.to_str()).unwrap();

        assert!(!config.store.seed_demo_schemas);
        assert_eq!(config.store.id_scheme, IdScheme::Sequential);
        assert_eq!(config.ui.theme, Theme::Dark);
        assert_eq!(config.ui.toast_ttl_ms, 5000);
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("METADESK__UI__THEME", "dark");
        std::env::set_var("METADESK__STORE__ID_SCHEME", "sequential");

        let loaded = DashboardConfig::load_from(None);

        std::env::remove_var("METADESK__UI__THEME");
        std::env::remove_var("METADESK__STORE__ID_SCHEME");

        let config = loaded.unwrap();
        assert_eq!(config.ui.theme, Theme::Dark);
        assert_eq!(config.store.id_scheme, IdScheme::Sequential);
        assert!(config.store.seed_demo_schemas);
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = DashboardConfig::load_from(path.to_str()).unwrap_err();
        assert!(matches!(err, crate::StoreError::Config(_)));
    }

    #[test]
    fn test_save_roundtrips_through_loader() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = DashboardConfig::default();
        config.ui.toast_ttl_ms = 1500;
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = DashboardConfig::load_from(path.to_str()).unwrap();
        assert_eq!(loaded.ui.toast_ttl_ms, 1500);
    }
}
