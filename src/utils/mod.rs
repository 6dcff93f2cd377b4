//! Utility functions shared across skinfont
//!
//! Common helpers that don't fit in specialized modules.

pub mod color;

pub use color::{parse_argb, Color, ColorTable};

use std::path::PathBuf;

/// Expand a leading `~` to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}
