use anyhow::Result;
use indicatif::ProgressStyle;

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Shown while `gnore update` is cloning or pulling the mirror.
pub fn spinner_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::with_template("\x1b[33m{spinner}\x1b[0m {wide_msg}")?
        .tick_strings(SPINNER_FRAMES))
}

/// Replaces the spinner once the mirror is cloned, updated or already current.
pub fn ok_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::with_template("\x1b[32m✔\x1b[0m {wide_msg}")?)
}

/// Replaces the spinner when the sync failed; the error itself is printed by `main`.
pub fn err_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::with_template("\x1b[31m✘\x1b[0m {wide_msg}")?)
}
