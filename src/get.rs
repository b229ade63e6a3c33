use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::fileops::{WriteOutcome, write_template};
use crate::templates::{IGNORE_FILE, MirrorDir, find_template};

/// Resolved template plus where it went and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placed {
    pub template: PathBuf,
    pub dest: PathBuf,
    pub outcome: WriteOutcome,
}

/// Write template `name` into `<dest_dir>/.gitignore`.
///
/// A fresh file is created as an exact copy; an existing one gets the
/// template appended after a blank line.
///
/// # Errors
/// - `Uninitialized` if the mirror has never been cloned.
/// - `TemplateNotFound` if nothing matches; the destination is not touched.
/// - Any file-operation failure.
pub fn place_template(settings: &Settings, name: &str, dest_dir: &Path) -> Result<Placed> {
    settings.mirror.ensure_initialized()?;
    let template = find_template(&MirrorDir::new(settings.mirror.root()), name)?;
    let dest = dest_dir.join(IGNORE_FILE);
    let outcome = write_template(&template, &dest)?;
    Ok(Placed {
        template,
        dest,
        outcome,
    })
}

fn info(msg: &str) {
    println!("{}", msg.blue().bold());
}

/// CLI command: copy or merge a template into the destination directory.
pub fn cmd_get(settings: &Settings, name: &str, dest_dir: &Path) -> Result<()> {
    let placed = place_template(settings, name, dest_dir)?;
    match placed.outcome {
        WriteOutcome::Created(_) => info("Copy..."),
        WriteOutcome::Merged => info("Merge..."),
    }
    tracing::info!(
        template = %placed.template.display(),
        dest = %placed.dest.display(),
        "template written"
    );
    info("Done.");
    Ok(())
}
