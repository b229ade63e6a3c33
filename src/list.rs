use anyhow::Result;

use crate::config::Settings;
use crate::templates::{MirrorDir, list_templates};

/// Template names available in the mirror, sorted case-insensitively.
///
/// # Errors
/// Fails with [`GnoreError::Uninitialized`](crate::GnoreError::Uninitialized)
/// before walking anything when the mirror has never been cloned.
pub fn available_templates(settings: &Settings) -> Result<Vec<String>> {
    settings.mirror.ensure_initialized()?;
    list_templates(&MirrorDir::new(settings.mirror.root()))
}

/// CLI command: print one template name per line.
pub fn cmd_list(settings: &Settings) -> Result<()> {
    for name in available_templates(settings)? {
        println!("{}", name);
    }
    Ok(())
}
