use std::path::{Path, PathBuf};

use crate::error::GnoreError;

/// Whether the mirror already holds a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorState {
    /// No `.git` metadata: the next update must clone.
    Uninitialized,
    /// A live checkout: the next update pulls.
    Initialized,
}

/// The local checkout of the upstream template repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
    root: PathBuf,
}

impl Mirror {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state(&self) -> MirrorState {
        if self.root.join(".git").exists() {
            MirrorState::Initialized
        } else {
            MirrorState::Uninitialized
        }
    }

    /// Fail with [`GnoreError::Uninitialized`] unless a checkout is present.
    pub fn ensure_initialized(&self) -> Result<(), GnoreError> {
        match self.state() {
            MirrorState::Initialized => Ok(()),
            MirrorState::Uninitialized => Err(GnoreError::Uninitialized {
                mirror: self.root.clone(),
            }),
        }
    }
}
