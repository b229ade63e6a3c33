use anyhow::{Context, Result};
use std::path::PathBuf;
use walkdir::WalkDir;

use super::TemplateSource;

/// Walks a mirror checkout on disk.
///
/// Entries are visited sorted by file name within each directory so "first
/// match" is stable across platforms. The `.git` directory is never entered.
#[derive(Debug, Clone)]
pub struct MirrorDir {
    root: PathBuf,
}

impl MirrorDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn is_git_dir(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == ".git"
}

impl TemplateSource for MirrorDir {
    fn files(&self) -> Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_git_dir(e))
        {
            let entry =
                entry.with_context(|| format!("failed to walk {}", self.root.display()))?;
            if entry.file_type().is_dir() {
                continue;
            }
            out.push(entry.into_path());
        }
        tracing::debug!(root = %self.root.display(), files = out.len(), "walked mirror");
        Ok(out)
    }
}
