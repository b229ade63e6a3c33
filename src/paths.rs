use anyhow::{Result, bail};
use std::ffi::OsString;
use std::{env, path::PathBuf};

/// Directory layout under the gnore home.
#[derive(Debug, Clone)]
pub struct Paths {
    pub home: PathBuf,
    pub templates: PathBuf,
    pub config: PathBuf,
}

/// Resolve the gnore home directory.
///
/// Lookup order: `$GNORE_HOME`, `$XDG_CONFIG_HOME/gnore`, `$HOME/.config/gnore`.
pub fn gnore_home() -> Result<PathBuf> {
    resolve_home(
        env::var_os("GNORE_HOME"),
        env::var_os("XDG_CONFIG_HOME"),
        env::var_os("HOME"),
    )
}

fn resolve_home(
    explicit: Option<OsString>,
    xdg: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(dir) = explicit.filter(|s| !s.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = xdg.filter(|s| !s.is_empty()) {
        return Ok(PathBuf::from(dir).join("gnore"));
    }
    match home.filter(|s| !s.is_empty()) {
        Some(dir) => Ok(PathBuf::from(dir).join(".config").join("gnore")),
        None => bail!("cannot locate gnore home: neither GNORE_HOME, XDG_CONFIG_HOME nor HOME is set"),
    }
}

pub fn paths() -> Result<Paths> {
    let home = gnore_home()?;
    Ok(Paths {
        templates: home.join("templates"),
        config: home.join("config.toml"),
        home,
    })
}
