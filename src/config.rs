//! CLI configuration: who you are and where campaign documents live.
//!
//! Identity here stands in for an external auth system; the core only ever
//! sees the resolved user id.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct MusterConfig {
    /// Default identity for every command (overridden by `--user`).
    pub user: Option<String>,
    /// Where campaign documents are stored. Defaults to the platform data
    /// dir, e.g. `~/.local/share/muster`.
    pub data_dir: Option<PathBuf>,
}

impl MusterConfig {
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join("muster").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(MusterConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let dir = dirs::data_dir().context("Could not determine data directory")?;
        Ok(dir.join("muster"))
    }

    /// Resolve the acting user: `--user` flag wins, then the config file.
    pub fn resolve_user(&self, flag: Option<String>) -> Result<String> {
        flag.or_else(|| self.user.clone()).context(
            "No user identity. Pass --user <name> or set `user` in the muster config file",
        )
    }
}
