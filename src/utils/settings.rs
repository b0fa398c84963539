//! Settings and configuration utilities.
//!
//! This module reads optional settings from $HOME/.patch-porter/settings.json.
//! The `env` table is a fallback for environment variables, and `rewrites`
//! holds `SRC=DEST` directives applied after the ones given on the command
//! line.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::patch::{RewriteError, RewriteRule};

/// Settings loaded from $HOME/.patch-porter/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Default `SRC=DEST` rewrite directives.
    #[serde(default)]
    pub rewrites: Vec<String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist, return default settings
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".patch-porter").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        env::var(key).ok().or_else(|| self.env.get(key).cloned())
    }

    /// Parses the configured rewrite directives.
    pub fn rewrite_rules(&self) -> Result<Vec<RewriteRule>, RewriteError> {
        self.rewrites.iter().map(|raw| raw.parse()).collect()
    }
}
