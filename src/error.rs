use std::path::PathBuf;
use thiserror::Error;

/// Failures that belong to gnore itself rather than to I/O or git.
///
/// They travel inside `anyhow::Error` and can be recovered with
/// `downcast_ref::<GnoreError>()`.
#[derive(Debug, Error)]
pub enum GnoreError {
    #[error("there are no templates yet in {}, run `gnore update` first", mirror.display())]
    Uninitialized { mirror: PathBuf },

    #[error("there's no template with the name: {name}")]
    TemplateNotFound { name: String },

    #[error("{} is not a regular file", path.display())]
    NotRegularFile { path: PathBuf },
}
