//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/gridtree/gridtree.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `GRIDTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::traversal::Traversal;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("configuration error: {message}")]
    Load { message: String },
}

/// Display and walk defaults for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Order used by `walk` and `find` when none is given
    pub order: Traversal,
    /// Append `(x, y)` to every node in `show`
    pub show_coordinates: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            order: Traversal::BreadthFirstLeft,
            show_coordinates: false,
        }
    }
}

/// Raw settings for intermediate parsing; `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub order: Option<Traversal>,
    pub show_coordinates: Option<bool>,
}

/// Get the XDG config directory for gridtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gridtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("gridtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Load {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Load {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            order: overlay.order.unwrap_or(self.order),
            show_coordinates: overlay.show_coordinates.unwrap_or(self.show_coordinates),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// A missing global file is skipped; a `local` path that does not exist is an error.
    pub fn load(local: Option<&Path>) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(local_path) = local {
            debug!(path = %local_path.display(), "loading local config");
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        let env = Config::builder()
            .add_source(Environment::with_prefix("GRIDTREE").separator("__"))
            .build()
            .map_err(config_err)?;
        Self::apply_overrides(current, &env)
    }

    /// Apply explicit key overrides (environment variables in practice).
    pub fn apply_overrides(mut settings: Self, config: &Config) -> Result<Self, SettingsError> {
        if let Ok(val) = config.get_string("order") {
            settings.order = val
                .parse()
                .map_err(|message: String| SettingsError::Load { message })?;
        }
        if let Ok(val) = config.get_bool("show_coordinates") {
            settings.show_coordinates = val;
        }
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Load {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# gridtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/gridtree/gridtree.toml
#   Local:  file given with --config
#   Env:    GRIDTREE_* environment variables

# Default order for walk and find:
#   breadth-left | breadth-right | depth-left | depth-right
# order = "breadth-left"

# Print (x, y) next to every node in `show`
# show_coordinates = false
"#
        .to_string()
    }
}

fn config_err(e: config::ConfigError) -> SettingsError {
    SettingsError::Load {
        message: e.to_string(),
    }
}
