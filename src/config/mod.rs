use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Context;
use serde::Deserialize;

/// Optional defaults loaded from the user's config file. Every field has a
/// CLI flag that overrides it.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct Config {
    pub(crate) server_url: Option<String>,
    pub(crate) sync_id: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) cache_dir: Option<PathBuf>,
}

impl Config {
    pub(crate) fn empty() -> Config {
        Config::default()
    }

    /// `budget-breakdown.toml` in the platform config directory.
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("budget-breakdown.toml"))
    }

    /// A missing file is not an error, just an empty config.
    pub(crate) fn load_from_file(path: &Path) -> anyhow::Result<Config> {
        if path.exists() && path.is_file() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
        } else {
            Ok(Config::empty())
        }
    }
}
