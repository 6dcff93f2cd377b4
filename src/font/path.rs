//! Glyph file resolution
//!
//! Search order: the skin's font directory, then the user-level shared
//! font directory, then the system-level one. Candidate paths get their
//! case corrected against the file system, since skins are often
//! authored on case-insensitive systems.

use crate::constants::GLYPH_FILE_EXTENSION;
use log::debug;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Directories searched for glyph files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontPaths {
    /// Skin-local font directory (`<skin>/fonts`)
    pub skin_fonts: PathBuf,
    /// User-level shared font directory
    pub user_fonts: PathBuf,
    /// System-level shared font directory
    pub system_fonts: PathBuf,
}

impl FontPaths {
    pub fn new(
        skin_fonts: impl Into<PathBuf>,
        user_fonts: impl Into<PathBuf>,
        system_fonts: impl Into<PathBuf>,
    ) -> Self {
        Self {
            skin_fonts: skin_fonts.into(),
            user_fonts: user_fonts.into(),
            system_fonts: system_fonts.into(),
        }
    }

    /// Resolve a glyph file name to a path.
    ///
    /// A missing file is not an error here: the last candidate (system
    /// directory) is returned and the rasterizer load reports the failure.
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        let requested = Path::new(file_name);
        let path = if requested.is_absolute() {
            requested.to_path_buf()
        } else {
            self.skin_fonts.join(requested)
        };
        let path = convert_case(&path);
        if path.exists() {
            return path;
        }

        let file = requested.file_name().unwrap_or_else(|| OsStr::new(file_name));
        for dir in [&self.user_fonts, &self.system_fonts] {
            let candidate = convert_case(&dir.join(file));
            if candidate.exists() {
                return candidate;
            }
            debug!("Glyph file not found: {}", candidate.display());
        }
        convert_case(&self.system_fonts.join(file))
    }

    /// Glyph files offered in settings as (label, value) pairs.
    ///
    /// System directory entries come first; the user directory is only
    /// listed when the system directory could be read.
    pub fn font_file_options(&self) -> Vec<(String, String)> {
        let Some(mut files) = list_glyph_files(&self.system_fonts) else {
            return Vec::new();
        };
        files.extend(list_glyph_files(&self.user_fonts).unwrap_or_default());
        files.into_iter().map(|name| (name.clone(), name)).collect()
    }
}

/// Check for the glyph-file extension, case-insensitively
pub fn has_glyph_extension(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(GLYPH_FILE_EXTENSION)
}

/// Sorted glyph file names in `dir` (None if it can't be listed)
fn list_glyph_files(dir: &Path) -> Option<Vec<String>> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| has_glyph_extension(name))
        .collect();
    names.sort();
    Some(names)
}

/// Correct the case of each path component against the file system.
/// Components that don't exist in any case are kept as given.
#[cfg(unix)]
pub fn convert_case(path: &Path) -> PathBuf {
    if path.exists() {
        return path.to_path_buf();
    }

    let mut result = PathBuf::new();
    let mut matching = true;
    for component in path.components() {
        let Component::Normal(name) = component else {
            result.push(component.as_os_str());
            continue;
        };
        if matching && !result.join(name).exists() {
            match find_case_insensitive(&result, name) {
                Some(actual) => {
                    result.push(actual);
                    continue;
                }
                None => matching = false,
            }
        }
        result.push(name);
    }
    result
}

#[cfg(not(unix))]
pub fn convert_case(path: &Path) -> PathBuf {
    path.to_path_buf()
}

#[cfg(unix)]
fn find_case_insensitive(dir: &Path, name: &OsStr) -> Option<std::ffi::OsString> {
    let wanted = name.to_str()?.to_lowercase();
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    std::fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|entry| entry.file_name())
        .find(|candidate| candidate.to_str().map(|c| c.to_lowercase() == wanted).unwrap_or(false))
}
