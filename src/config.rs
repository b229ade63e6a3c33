use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::mirror::Mirror;
use crate::paths::Paths;

pub const DEFAULT_REPO_URL: &str = "https://github.com/github/gitignore.git";
pub const DEFAULT_REMOTE: &str = "origin";

/// Contents of `config.toml` in the gnore home.
///
/// Every key is optional; a missing file behaves like an empty one.
///
/// Example TOML:
/// ```toml
/// repo      = "https://github.com/github/gitignore.git"
/// remote    = "origin"
/// templates = "/srv/gnore/templates"
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub repo: String,
    pub remote: String,
    pub templates: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: DEFAULT_REPO_URL.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            templates: None,
        }
    }
}

/// Load `config.toml` from `path`.
///
/// # Errors
/// - Returns an error if the file exists but cannot be read.
/// - Returns an error if parsing the TOML fails.
pub fn load_config(path: &Path) -> Result<Config> {
    let txt = match fs::read_to_string(path) {
        Ok(txt) => txt,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let cfg: Config =
        toml::from_str(&txt).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(cfg)
}

/// Fully resolved runtime settings shared by every command.
#[derive(Debug, Clone)]
pub struct Settings {
    pub mirror: Mirror,
    pub repo: String,
    pub remote: String,
}

impl Settings {
    /// Combine the config file with command-line overrides.
    ///
    /// Mirror precedence: `mirror_override` > `templates` key > `<home>/templates`.
    pub fn resolve(paths: &Paths, cfg: Config, mirror_override: Option<PathBuf>) -> Self {
        let dir = mirror_override
            .or(cfg.templates)
            .unwrap_or_else(|| paths.templates.clone());
        Self {
            mirror: Mirror::new(dir),
            repo: cfg.repo,
            remote: cfg.remote,
        }
    }

    pub fn load(paths: &Paths, mirror_override: Option<PathBuf>) -> Result<Self> {
        let cfg = load_config(&paths.config)?;
        Ok(Self::resolve(paths, cfg, mirror_override))
    }
}
