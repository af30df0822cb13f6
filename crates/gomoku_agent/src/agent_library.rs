//! Named agent presets loaded from a directory of `.toml` files.
//!
//! Every strategy variant is a preset; `play --agent <name>` picks one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::agent_config::{AgentConfig, ConfigError};

/// Presets keyed by their `name` field.
#[derive(Debug, Clone, Default)]
pub struct AgentLibrary {
    presets: BTreeMap<String, AgentConfig>,
}

impl AgentLibrary {
    /// Loads every `*.toml` preset in `dir`.
    ///
    /// Files that fail to parse are skipped with a warning. Other files
    /// (instruction markdown, notes) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `dir` cannot be read or two presets share a name.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn scan(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            ConfigError::new(format!("Cannot read preset directory {}: {}", dir.display(), e))
        })?;

        let mut presets = BTreeMap::new();
        for entry in entries {
            let path = entry
                .map_err(|e| ConfigError::new(format!("Cannot read preset entry: {}", e)))?
                .path();
            if path.extension().is_none_or(|ext| ext != "toml") || !path.is_file() {
                continue;
            }

            let preset = match AgentConfig::from_file(&path) {
                Ok(preset) => preset,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable preset");
                    continue;
                }
            };
            debug!(name = %preset.name(), path = %path.display(), "Loaded preset");

            if let Some(previous) = presets.insert(preset.name().clone(), preset) {
                return Err(ConfigError::new(format!(
                    "Preset name {:?} is defined more than once in {}",
                    previous.name(),
                    dir.display()
                )));
            }
        }

        info!(count = presets.len(), "Agent presets loaded");
        Ok(Self { presets })
    }

    /// Preset directory: `$GOMOKU_AGENTS`, else
    /// `$XDG_CONFIG_HOME/gomoku_agent/agents`, else `./agents`.
    pub fn default_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("GOMOKU_AGENTS") {
            return PathBuf::from(dir);
        }
        match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join("gomoku_agent").join("agents"),
            Err(_) => PathBuf::from("agents"),
        }
    }

    /// Presets in name order.
    pub fn presets(&self) -> impl Iterator<Item = &AgentConfig> {
        self.presets.values()
    }

    /// Looks up the preset called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] listing the known names if there is no such preset.
    #[instrument(skip(self))]
    pub fn select(&self, name: &str) -> Result<&AgentConfig, ConfigError> {
        self.presets.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.presets.keys().map(String::as_str).collect();
            ConfigError::new(format!(
                "Unknown agent preset {:?} (available: {})",
                name,
                known.join(", ")
            ))
        })
    }
}
