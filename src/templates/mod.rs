//! Template discovery inside the mirror.
//!
//! Lookup is written against the [`TemplateSource`] capability so the
//! matching rules can be exercised without a real checkout.
//! [`MirrorDir`] is the on-disk implementation.

mod walk;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::error::GnoreError;

pub use walk::MirrorDir;

/// Extension (without the dot) marking a file as a template.
pub const TEMPLATE_EXT: &str = "gitignore";

/// File written into the destination directory by `gnore get`.
pub const IGNORE_FILE: &str = ".gitignore";

/// Anything that can enumerate candidate template files.
pub trait TemplateSource {
    /// All file paths, in traversal order.
    fn files(&self) -> Result<Vec<PathBuf>>;
}

/// Name shown for a template file: its file name up to the first `.`.
///
/// Returns `None` for files that do not carry the template extension.
pub fn template_name(path: &Path) -> Option<String> {
    if path.extension()? != TEMPLATE_EXT {
        return None;
    }
    let file_name = path.file_name()?.to_string_lossy();
    let name = file_name.split('.').next().unwrap_or_default();
    Some(name.to_string())
}

/// Every template name, sorted case-insensitively.
pub fn list_templates(source: &dyn TemplateSource) -> Result<Vec<String>> {
    let mut names: Vec<String> = source
        .files()?
        .iter()
        .filter_map(|p| template_name(p))
        .collect();
    names.sort_by_cached_key(|n| n.to_lowercase());
    Ok(names)
}

/// First file whose whole name equals `<name>.gitignore`, ignoring case.
///
/// # Errors
/// [`GnoreError::TemplateNotFound`] when nothing matches after the full walk.
pub fn find_template(source: &dyn TemplateSource, name: &str) -> Result<PathBuf> {
    let wanted = format!("{name}.{TEMPLATE_EXT}").to_lowercase();
    let found = source.files()?.into_iter().find(|p| {
        p.file_name()
            .map(|f| f.to_string_lossy().to_lowercase() == wanted)
            .unwrap_or(false)
    });
    match found {
        Some(path) => {
            tracing::debug!(name, path = %path.display(), "template resolved");
            Ok(path)
        }
        None => Err(GnoreError::TemplateNotFound {
            name: name.to_string(),
        }
        .into()),
    }
}
