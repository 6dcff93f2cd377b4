//! Rasterizer cache
//!
//! A rasterizer is one loaded glyph file at a device size/aspect, with
//! or without border. Fonts that differ only in color or style share
//! the same rasterizer through `Rc`; the cache holds one entry per key.

use crate::error::{FontError, FontResult};
use anyhow::{anyhow, Context, Result};
use fontdue::{Font, FontSettings};
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Device parameters a glyph file is rasterized with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterParams {
    /// Device size (pixels)
    pub size: f32,
    /// Device aspect (horizontal stretch)
    pub aspect: f32,
    /// Render glyphs with a border
    pub border: bool,
}

/// Cache key: file name, size, aspect and border flag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RasterizerKey(String);

impl RasterizerKey {
    pub fn new(file_name: &str, params: &RasterParams) -> Self {
        Self(format!(
            "{}_{:.6}_{:.6}{}",
            file_name,
            params.size,
            params.aspect,
            if params.border { "_border" } else { "" }
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RasterizerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bitmap produced for one glyph
#[derive(Debug, Clone)]
pub struct GlyphBitmap {
    /// Coverage, 1 byte per pixel
    pub bitmap: Vec<u8>,
    pub width: usize,
    pub height: usize,
    /// Horizontal advance (pixels, aspect applied)
    pub advance: f32,
}

/// Native glyph-rendering state of a loaded rasterizer
pub trait GlyphFace {
    /// Distance between baselines (pixels)
    fn line_height(&self) -> f32;

    fn has_glyph(&self, ch: char) -> bool;

    fn rasterize(&self, ch: char) -> Option<GlyphBitmap>;
}

/// Backend that turns a glyph file into a `GlyphFace`
pub trait GlyphLoader {
    fn load(&self, path: &Path, params: &RasterParams) -> Result<Box<dyn GlyphFace>>;
}

/// Default backend: fontdue
#[derive(Debug, Default, Clone, Copy)]
pub struct FontdueLoader;

struct FontdueFace {
    font: Font,
    params: RasterParams,
}

impl GlyphLoader for FontdueLoader {
    fn load(&self, path: &Path, params: &RasterParams) -> Result<Box<dyn GlyphFace>> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;
        let settings = FontSettings {
            scale: params.size,
            ..Default::default()
        };
        let font = Font::from_bytes(data, settings)
            .map_err(|e| anyhow!("Failed to parse font file: {} ({})", path.display(), e))?;
        Ok(Box::new(FontdueFace {
            font,
            params: *params,
        }))
    }
}

impl GlyphFace for FontdueFace {
    fn line_height(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.params.size)
            .map(|m| m.new_line_size)
            .unwrap_or(self.params.size)
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.font.lookup_glyph_index(ch) != 0
    }

    fn rasterize(&self, ch: char) -> Option<GlyphBitmap> {
        if !self.has_glyph(ch) {
            return None;
        }
        let (metrics, bitmap) = self.font.rasterize(ch, self.params.size);
        Some(GlyphBitmap {
            bitmap,
            width: metrics.width,
            height: metrics.height,
            advance: metrics.advance_width * self.params.aspect,
        })
    }
}

/// One loaded glyph file at specific device parameters
pub struct Rasterizer {
    key: RasterizerKey,
    path: PathBuf,
    params: RasterParams,
    face: Box<dyn GlyphFace>,
}

impl Rasterizer {
    pub fn key(&self) -> &RasterizerKey {
        &self.key
    }

    /// Resolved glyph file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn params(&self) -> &RasterParams {
        &self.params
    }

    pub fn face(&self) -> &dyn GlyphFace {
        self.face.as_ref()
    }
}

impl fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rasterizer")
            .field("key", &self.key)
            .field("path", &self.path)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Loaded rasterizers by key
#[derive(Debug, Default)]
pub struct RasterizerCache {
    entries: HashMap<RasterizerKey, Rc<Rasterizer>>,
}

impl RasterizerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &RasterizerKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Return the cached rasterizer for `key`, or load `path` and cache it.
    /// Nothing is cached when loading fails.
    pub fn get_or_load(
        &mut self,
        key: RasterizerKey,
        path: &Path,
        params: &RasterParams,
        loader: &dyn GlyphLoader,
    ) -> FontResult<Rc<Rasterizer>> {
        if let Some(existing) = self.entries.get(&key) {
            debug!("Font file already loaded: {}", key);
            return Ok(Rc::clone(existing));
        }

        let face = loader.load(path, params).map_err(|source| FontError::Rasterizer {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded font file {} ({})", key, path.display());

        let rasterizer = Rc::new(Rasterizer {
            key: key.clone(),
            path: path.to_path_buf(),
            params: *params,
            face,
        });
        self.entries.insert(key, Rc::clone(&rasterizer));
        Ok(rasterizer)
    }

    /// Remove a rasterizer by identity. Fonts still holding it keep it alive.
    pub fn release(&mut self, rasterizer: &Rc<Rasterizer>) -> bool {
        let key = rasterizer.key();
        match self.entries.get(key) {
            Some(entry) if Rc::ptr_eq(entry, rasterizer) => {
                self.entries.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Drop entries no font references any more
    pub fn collect_unreferenced(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, rasterizer| Rc::strong_count(rasterizer) > 1);
        let freed = before - self.entries.len();
        if freed > 0 {
            debug!("Freed {} unreferenced font files", freed);
        }
        freed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
