//! Git integration layer.
//!
//! The rest of the crate talks to git only through [`SyncBackend`], so the
//! sync logic can run against a fake in tests. [`Git2Backend`] is the real
//! implementation, built on the `git2` crate.

mod git2_backend;

use anyhow::Result;
use std::path::Path;

pub use git2_backend::Git2Backend;

/// Result of pulling into an existing checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// The local branch was fast-forwarded.
    Updated,
    /// Nothing new on the remote.
    UpToDate,
}

/// The version-control operations gnore needs.
pub trait SyncBackend {
    /// Clone `url` into `dest`, including submodules recursively.
    ///
    /// `dest` exists and is empty when this is called.
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// Pull from `remote` into the checkout at `dest`.
    fn pull(&self, dest: &Path, remote: &str) -> Result<PullOutcome>;
}
