//! Skin layout
//!
//! A skin directory holds one folder per authoring resolution
//! (e.g. `720p/Font.xml`), a `fonts/` media directory with glyph files
//! and an optional `colors/defaults.xml` color table.

use crate::constants::{COLOR_DOCUMENT, SKIN_FONT_DIR};
use crate::display::ResolutionInfo;
use crate::utils::ColorTable;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A resolution folder declared by the skin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinResolution {
    /// Folder name under the skin root
    pub folder: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f32,
}

fn default_pixel_ratio() -> f32 {
    1.0
}

impl SkinResolution {
    pub fn new(folder: &str, width: u32, height: u32) -> Self {
        Self {
            folder: folder.to_string(),
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    pub fn info(&self) -> ResolutionInfo {
        ResolutionInfo::new(self.width, self.height, self.pixel_ratio)
    }
}

/// Active skin
#[derive(Debug, Clone)]
pub struct Skin {
    root: PathBuf,
    resolutions: Vec<SkinResolution>,
    /// Index into `resolutions`
    default_resolution: usize,
}

impl Skin {
    /// Create a skin rooted at `root`.
    /// `default_folder` selects the default resolution; the first declared
    /// one is used when it doesn't match any folder.
    pub fn new(
        root: impl Into<PathBuf>,
        resolutions: Vec<SkinResolution>,
        default_folder: &str,
    ) -> Self {
        let mut resolutions = resolutions;
        if resolutions.is_empty() {
            resolutions.push(SkinResolution::new("720p", 1280, 720));
        }
        let default_resolution = resolutions
            .iter()
            .position(|r| r.folder.eq_ignore_ascii_case(default_folder))
            .unwrap_or_else(|| {
                warn!(
                    "Skin default resolution '{}' not declared, using '{}'",
                    default_folder, resolutions[0].folder
                );
                0
            });
        Self {
            root: root.into(),
            resolutions,
            default_resolution,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the skin's glyph files
    pub fn font_dir(&self) -> PathBuf {
        self.root.join(SKIN_FONT_DIR)
    }

    pub fn default_resolution(&self) -> ResolutionInfo {
        self.resolutions[self.default_resolution].info()
    }

    /// Locate a skin file for the active display.
    ///
    /// The resolution folder matching the active height is tried first,
    /// then the default folder. Returns the path together with the
    /// resolution the file was authored for; the default-folder path is
    /// returned even if it does not exist.
    pub fn skin_path(&self, file: &str, active: &ResolutionInfo) -> (PathBuf, ResolutionInfo) {
        if let Some(matching) = self.resolutions.iter().find(|r| r.height == active.height) {
            let path = self.root.join(&matching.folder).join(file);
            if path.exists() {
                return (path, matching.info());
            }
            debug!("Skin file {} not found, trying default resolution", path.display());
        }
        let default = &self.resolutions[self.default_resolution];
        (self.root.join(&default.folder).join(file), default.info())
    }

    /// Load the skin's named colors (empty table if the skin has none)
    pub fn colors(&self) -> ColorTable {
        let path = self.root.join(COLOR_DOCUMENT);
        if !path.exists() {
            return ColorTable::new();
        }
        match ColorTable::load(&path) {
            Ok(table) => table,
            Err(e) => {
                warn!("{:#}", e);
                ColorTable::new()
            }
        }
    }
}
