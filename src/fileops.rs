use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::error::GnoreError;

/// Written between existing content and an appended template.
pub const MERGE_SEPARATOR: &str = "\n\n";

/// What [`write_template`] did to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Destination did not exist and was created as a copy; carries bytes written.
    Created(u64),
    /// Destination existed and the template was appended to it.
    Merged,
}

/// Follows symlinks, so a link to a regular file is accepted.
fn ensure_regular(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).with_context(|| format!("cannot stat {}", path.display()))?;
    if !meta.is_file() {
        return Err(GnoreError::NotRegularFile {
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

/// Copy `src` over `dest`, creating or truncating it.
///
/// # Errors
/// Fails before touching `dest` if `src` is missing or not a regular file,
/// and on any I/O error while copying.
pub fn copy(src: &Path, dest: &Path) -> Result<u64> {
    ensure_regular(src)?;

    let mut from = File::open(src).with_context(|| format!("cannot open {}", src.display()))?;
    let mut to = File::create(dest).with_context(|| format!("cannot create {}", dest.display()))?;
    let n = io::copy(&mut from, &mut to)
        .with_context(|| format!("copying {} to {}", src.display(), dest.display()))?;
    tracing::debug!(src = %src.display(), dest = %dest.display(), bytes = n, "copied");
    Ok(n)
}

/// Append [`MERGE_SEPARATOR`] and the whole of `src` to `dest`.
///
/// # Errors
/// Both paths must be regular files; this is checked before any write.
pub fn merge_append(src: &Path, dest: &Path) -> Result<()> {
    ensure_regular(src)?;
    ensure_regular(dest)?;

    let body = fs::read(src).with_context(|| format!("error while reading {}", src.display()))?;
    let mut out = OpenOptions::new()
        .append(true)
        .open(dest)
        .with_context(|| format!("cannot open {} for append", dest.display()))?;

    let mut buf = Vec::with_capacity(MERGE_SEPARATOR.len() + body.len());
    buf.extend_from_slice(MERGE_SEPARATOR.as_bytes());
    buf.extend_from_slice(&body);
    out.write_all(&buf)
        .with_context(|| format!("error while merging {} into {}", src.display(), dest.display()))?;
    tracing::debug!(src = %src.display(), dest = %dest.display(), "merged");
    Ok(())
}

/// Copy the template when `dest` is absent, otherwise merge it in.
pub fn write_template(src: &Path, dest: &Path) -> Result<WriteOutcome> {
    if dest.exists() {
        merge_append(src, dest)?;
        Ok(WriteOutcome::Merged)
    } else {
        copy(src, dest).map(WriteOutcome::Created)
    }
}
