//! Logical font registry
//!
//! Each entry pairs a `Font` with the pre-rescale parameters it was
//! created from, so a reload can recompute device values. Callers get
//! generational `FontHandle`s; a handle outliving `unload`/`clear`
//! resolves to `FontError::InvalidHandle`.

use super::rasterizer::Rasterizer;
use super::FontStyle;
use crate::constants::{DEFAULT_FONT_NAME, NO_FONT_NAME};
use crate::display::ResolutionInfo;
use crate::error::{FontError, FontResult};
use crate::utils::Color;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Non-owning reference to a registered font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle {
    slot: usize,
    generation: u64,
}

/// Parameters a font was declared with, before rescaling
#[derive(Debug, Clone, PartialEq)]
pub struct OriginalFontSpec {
    /// Nominal size
    pub size: i32,
    /// Nominal aspect
    pub aspect: f32,
    /// Resolved glyph file path
    pub path: PathBuf,
    /// Glyph file name as requested
    pub file_name: String,
    /// Resolution the size/aspect were authored for
    pub source: ResolutionInfo,
    pub preserve_aspect: bool,
    pub border: bool,
}

/// Logical font: name, style and colors on top of a shared rasterizer
#[derive(Debug)]
pub struct Font {
    name: String,
    style: FontStyle,
    text_color: Color,
    shadow_color: Color,
    line_spacing: f32,
    size: f32,
    rasterizer: Rc<Rasterizer>,
}

impl Font {
    pub fn new(
        name: &str,
        style: FontStyle,
        text_color: Color,
        shadow_color: Color,
        line_spacing: f32,
        size: f32,
        rasterizer: Rc<Rasterizer>,
    ) -> Self {
        Self {
            name: name.to_string(),
            style,
            text_color,
            shadow_color,
            line_spacing,
            size,
            rasterizer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn shadow_color(&self) -> Color {
        self.shadow_color
    }

    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    /// Nominal size (before rescaling)
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn rasterizer(&self) -> &Rc<Rasterizer> {
        &self.rasterizer
    }

    /// Line height on the device, line spacing applied
    pub fn line_height(&self) -> f32 {
        self.rasterizer.face().line_height() * self.line_spacing
    }

    fn set_rasterizer(&mut self, rasterizer: Rc<Rasterizer>) {
        self.rasterizer = rasterizer;
    }
}

struct Entry {
    generation: u64,
    font: Font,
    origin: OriginalFontSpec,
}

/// Registered fonts in registration order
#[derive(Default)]
pub struct FontRegistry {
    /// Freed slots are reused; `order` keeps registration order
    slots: Vec<Option<Entry>>,
    free: Vec<usize>,
    order: Vec<usize>,
    names: HashMap<String, usize>,
    /// Survives `clear` so stale handles never match a new font
    next_generation: u64,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font. A name that is already taken keeps its font.
    pub fn create(&mut self, font: Font, origin: OriginalFontSpec) -> FontHandle {
        if let Some(existing) = self.lookup(font.name(), false) {
            warn!("Font '{}' already registered", font.name());
            return existing;
        }

        let name = font.name().to_string();
        let generation = self.next_generation;
        self.next_generation += 1;
        let entry = Some(Entry {
            generation,
            font,
            origin,
        });
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = entry;
                slot
            }
            None => {
                self.slots.push(entry);
                self.slots.len() - 1
            }
        };
        self.names.insert(name, slot);
        self.order.push(slot);
        FontHandle { slot, generation }
    }

    /// Find a font by exact name.
    ///
    /// With `allow_fallback`, an unknown name (other than empty, the
    /// no-font sentinel or the default name itself) resolves to the
    /// default font.
    pub fn lookup(&self, name: &str, allow_fallback: bool) -> Option<FontHandle> {
        if let Some(&slot) = self.names.get(name) {
            return self.handle_at(slot);
        }
        if allow_fallback && !name.is_empty() && name != NO_FONT_NAME && name != DEFAULT_FONT_NAME {
            debug!("Font '{}' not found, falling back to '{}'", name, DEFAULT_FONT_NAME);
            return self.lookup(DEFAULT_FONT_NAME, true);
        }
        None
    }

    pub fn get(&self, handle: FontHandle) -> FontResult<&Font> {
        self.entry(handle).map(|entry| &entry.font)
    }

    pub fn origin(&self, handle: FontHandle) -> FontResult<&OriginalFontSpec> {
        self.entry(handle).map(|entry| &entry.origin)
    }

    pub fn contains(&self, handle: FontHandle) -> bool {
        self.entry(handle).is_ok()
    }

    /// The font named `font13`, else the first registered font
    pub fn default_font(&self) -> Option<FontHandle> {
        self.lookup(DEFAULT_FONT_NAME, false)
            .or_else(|| self.handles().into_iter().next())
    }

    /// Swap the rasterizer behind a font; the handle stays valid
    pub(crate) fn rebind(
        &mut self,
        handle: FontHandle,
        rasterizer: Rc<Rasterizer>,
    ) -> FontResult<()> {
        let entry = self
            .slots
            .get_mut(handle.slot)
            .and_then(Option::as_mut)
            .filter(|entry| entry.generation == handle.generation)
            .ok_or(FontError::InvalidHandle)?;
        entry.font.set_rasterizer(rasterizer);
        Ok(())
    }

    /// Remove the font with this exact name. Returns false if there was none.
    pub fn unload(&mut self, name: &str) -> bool {
        let Some(slot) = self.names.remove(name) else {
            return false;
        };
        self.slots[slot] = None;
        self.free.push(slot);
        self.order.retain(|&s| s != slot);
        debug!("Unloaded font '{}'", name);
        true
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.order.clear();
        self.names.clear();
    }

    /// Handles in registration order
    pub fn handles(&self) -> Vec<FontHandle> {
        self.iter().map(|(handle, _, _)| handle).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FontHandle, &Font, &OriginalFontSpec)> {
        self.order.iter().filter_map(|&slot| {
            self.slots.get(slot)?.as_ref().map(|entry| {
                (
                    FontHandle {
                        slot,
                        generation: entry.generation,
                    },
                    &entry.font,
                    &entry.origin,
                )
            })
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn handle_at(&self, slot: usize) -> Option<FontHandle> {
        self.slots.get(slot)?.as_ref().map(|entry| FontHandle {
            slot,
            generation: entry.generation,
        })
    }

    fn entry(&self, handle: FontHandle) -> FontResult<&Entry> {
        self.slots
            .get(handle.slot)
            .and_then(Option::as_ref)
            .filter(|entry| entry.generation == handle.generation)
            .ok_or(FontError::InvalidHandle)
    }
}
