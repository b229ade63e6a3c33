//! Crate entry point for **gnore**.
//!
//! This library provides the implementation behind the `gnore` CLI.
//! Each submodule encapsulates one responsibility (config, git operations,
//! template lookup, file merging, etc.).
//! The `pub use` re-exports make the commands accessible from the crate root.

mod config;
mod error;
mod fileops;
mod get;
mod git;
mod list;
mod mirror;
mod paths;
mod sync;
mod templates;

pub use config::{Config, Settings, load_config};
pub use error::GnoreError;
pub use fileops::{WriteOutcome, copy, merge_append, write_template};
pub use get::{Placed, cmd_get, place_template};
pub use git::{Git2Backend, PullOutcome, SyncBackend};
pub use list::{available_templates, cmd_list};
pub use mirror::{Mirror, MirrorState};
pub use paths::{Paths, gnore_home, paths};
pub use sync::{SyncOutcome, cmd_update, sync};
pub use templates::{
    IGNORE_FILE, MirrorDir, TEMPLATE_EXT, TemplateSource, find_template, list_templates,
};
