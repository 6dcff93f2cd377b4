//! Configuration file management
//!
//! Loads TOML configuration files and provides skin, display and
//! font directory settings.
//! Default config path: ~/.config/skinfont/config.toml

use crate::display::{Display, ResolutionInfo};
use crate::font::FontPaths;
use crate::skin::{Skin, SkinResolution};
use crate::utils::expand_tilde;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Skin settings
    pub skin: SkinConfig,
    /// Display settings
    pub display: DisplayConfig,
    /// Shared font directory settings
    pub paths: PathConfig,
}

/// Skin settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinConfig {
    /// Skin root directory (~ is expanded)
    pub path: String,
    /// Font-set to load from the skin's Font.xml
    pub font_set: String,
    /// Resolution folders the skin provides
    pub resolutions: Vec<SkinResolution>,
    /// Folder of the resolution the skin is authored for
    pub default_resolution: String,
}

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Active mode width (pixels)
    pub width: u32,
    /// Active mode height (pixels)
    pub height: u32,
    /// Pixel aspect ratio of the active mode
    pub pixel_ratio: f32,
    /// Skin zoom in percent (-20..=20 is typical)
    pub zoom: i32,
}

/// Shared font directories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// User-level glyph directory (empty = <data dir>/skinfont/media/Fonts)
    pub user_fonts: String,
    /// System-level glyph directory
    pub system_fonts: String,
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self {
            path: "~/.local/share/skinfont/skin".to_string(),
            font_set: "Default".to_string(),
            resolutions: vec![
                SkinResolution::new("720p", 1280, 720),
                SkinResolution::new("1080i", 1920, 1080),
            ],
            default_resolution: "720p".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            pixel_ratio: 1.0,
            zoom: 0,
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            user_fonts: String::new(),
            system_fonts: "/usr/share/skinfont/media/Fonts".to_string(),
        }
    }
}

impl DisplayConfig {
    pub fn resolution(&self) -> ResolutionInfo {
        ResolutionInfo::new(self.width, self.height, self.pixel_ratio)
    }

    pub fn to_display(&self) -> Display {
        Display::with_zoom(self.resolution(), self.zoom)
    }
}

impl SkinConfig {
    pub fn to_skin(&self) -> Skin {
        Skin::new(
            expand_tilde(&self.path),
            self.resolutions.clone(),
            &self.default_resolution,
        )
    }
}

impl PathConfig {
    /// Resolved user-level glyph directory
    pub fn user_fonts_dir(&self) -> PathBuf {
        if !self.user_fonts.is_empty() {
            return expand_tilde(&self.user_fonts);
        }
        dirs::data_dir()
            .map(|d| d.join("skinfont").join("media").join("Fonts"))
            .unwrap_or_else(|| expand_tilde("~/.local/share/skinfont/media/Fonts"))
    }

    pub fn system_fonts_dir(&self) -> PathBuf {
        expand_tilde(&self.system_fonts)
    }

    pub fn to_font_paths(&self, skin: &Skin) -> FontPaths {
        FontPaths::new(skin.font_dir(), self.user_fonts_dir(), self.system_fonts_dir())
    }
}

impl Config {
    /// System-wide config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/skinfont/config.toml";

    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. SKINFONT_CONFIG environment variable
        if let Ok(path) = std::env::var("SKINFONT_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                return Some(p);
            }
        }

        // 2. User config: ~/.config/skinfont/config.toml
        if let Some(config_path) = default_config_path() {
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // 3. System config: /etc/skinfont/config.toml
        let system_config = PathBuf::from(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with priority:
    /// 1. SKINFONT_CONFIG environment variable
    /// 2. ~/.config/skinfont/config.toml (user config)
    /// 3. /etc/skinfont/config.toml (system config)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("skinfont").join("config.toml"))
}
