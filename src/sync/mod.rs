mod progress;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::fs;
use std::time::Duration;

use crate::config::Settings;
use crate::git::{Git2Backend, PullOutcome, SyncBackend};
use crate::mirror::{Mirror, MirrorState};

use progress::{err_style, ok_style, spinner_style};

/// What [`sync`] did to the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Cloned,
    Updated,
    UpToDate,
}

/// Bring the mirror in line with `url`.
///
/// - `Uninitialized`: create the directory (with parents) and clone into it.
/// - `Initialized`: pull from `remote`. Never re-clones.
///
/// # Errors
/// Directory creation, clone and pull failures are returned as-is with context;
/// nothing is retried.
pub fn sync(
    mirror: &Mirror,
    url: &str,
    remote: &str,
    backend: &dyn SyncBackend,
) -> Result<SyncOutcome> {
    match mirror.state() {
        MirrorState::Uninitialized => {
            fs::create_dir_all(mirror.root())
                .with_context(|| format!("cannot create {}", mirror.root().display()))?;
            backend.clone_repo(url, mirror.root())?;
            Ok(SyncOutcome::Cloned)
        }
        MirrorState::Initialized => match backend.pull(mirror.root(), remote)? {
            PullOutcome::Updated => Ok(SyncOutcome::Updated),
            PullOutcome::UpToDate => Ok(SyncOutcome::UpToDate),
        },
    }
}

/// CLI command: clone or pull the template mirror.
///
/// A spinner runs while git works; it ends with a green ✔ line, or a red ✘
/// line before the error is handed back to the caller.
pub fn cmd_update(settings: &Settings) -> Result<()> {
    let mirror = &settings.mirror;
    let verb = match mirror.state() {
        MirrorState::Uninitialized => "cloning",
        MirrorState::Initialized => "updating",
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style()?);
    pb.set_message(format!("{} templates from {}", verb, settings.repo));
    pb.enable_steady_tick(Duration::from_millis(80));

    match sync(mirror, &settings.repo, &settings.remote, &Git2Backend) {
        Ok(outcome) => {
            let msg = match outcome {
                SyncOutcome::Cloned => format!("templates cloned into {}", mirror.root().display()),
                SyncOutcome::Updated => "templates updated".to_string(),
                SyncOutcome::UpToDate => "templates already up to date".to_string(),
            };
            pb.set_style(ok_style()?);
            pb.finish_with_message(msg);
            Ok(())
        }
        Err(e) => {
            pb.set_style(err_style()?);
            pb.finish_with_message(format!("{} templates failed", verb));
            Err(e)
        }
    }
}
