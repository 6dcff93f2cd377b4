//! Font manager
//!
//! Loads the skin's font-set, creates fonts on demand and keeps their
//! rasterizers in step with the display resolution.

use super::device::{
    DeviceAction, DeviceLossCoordinator, DeviceState, GuiMessage, Notification, NotificationSink,
};
use super::fontset::{FontDeclaration, FontDocument};
use super::path::FontPaths;
use super::rasterizer::{FontdueLoader, GlyphLoader, RasterParams, RasterizerCache, RasterizerKey};
use super::registry::{Font, FontHandle, FontRegistry, OriginalFontSpec};
use super::rescale::rescale_size_and_aspect;
use super::FontStyle;
use crate::constants::{
    BORDER_TEXT_COLOR, DEFAULT_BORDER_FONT_NAME, DEFAULT_LINE_SPACING, FALLBACK_GLYPH_FILE,
    FONT_DOCUMENT,
};
use crate::display::{DisplayScaling, ResolutionInfo};
use crate::error::{FontError, FontResult};
use crate::skin::Skin;
use crate::utils::{Color, ColorTable};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::rc::Rc;

/// Everything needed to create one font
#[derive(Debug, Clone, PartialEq)]
pub struct TtfRequest {
    pub font_name: String,
    pub file_name: String,
    pub text_color: Color,
    pub shadow_color: Color,
    /// Nominal size
    pub size: i32,
    pub style: FontStyle,
    pub border: bool,
    pub line_spacing: f32,
    /// Nominal aspect
    pub aspect: f32,
    /// Resolution size/aspect are authored for (None = skin resolution)
    pub source: Option<ResolutionInfo>,
    pub preserve_aspect: bool,
}

impl TtfRequest {
    pub fn new(font_name: &str, file_name: &str, size: i32) -> Self {
        Self {
            font_name: font_name.to_string(),
            file_name: file_name.to_string(),
            text_color: 0,
            shadow_color: 0,
            size,
            style: FontStyle::empty(),
            border: false,
            line_spacing: DEFAULT_LINE_SPACING,
            aspect: 1.0,
            source: None,
            preserve_aspect: false,
        }
    }

    fn from_declaration(decl: &FontDeclaration, colors: &ColorTable) -> Self {
        let color = |token: &Option<String>| {
            token
                .as_deref()
                .and_then(|t| colors.resolve(t))
                .unwrap_or(0)
        };
        Self {
            text_color: color(&decl.color),
            shadow_color: color(&decl.shadow),
            style: decl.style,
            line_spacing: decl.line_spacing,
            aspect: decl.aspect,
            ..Self::new(&decl.name, &decl.file_name, decl.size)
        }
    }
}

/// Owner of all skin fonts and their rasterizers
pub struct FontManager {
    registry: FontRegistry,
    cache: RasterizerCache,
    loader: Box<dyn GlyphLoader>,
    display: Rc<dyn DisplayScaling>,
    skin: Skin,
    paths: FontPaths,
    colors: ColorTable,
    /// Resolution of the loaded font document (default source resolution)
    skin_resolution: ResolutionInfo,
    /// The loaded font-set is unicode
    fontset_unicode: bool,
    device: DeviceLossCoordinator,
    sink: Option<Box<dyn NotificationSink>>,
}

impl FontManager {
    /// Create a manager using the fontdue backend
    pub fn new(skin: Skin, paths: FontPaths, display: Rc<dyn DisplayScaling>) -> Self {
        let skin_resolution = skin.default_resolution();
        Self {
            registry: FontRegistry::new(),
            cache: RasterizerCache::new(),
            loader: Box::new(FontdueLoader),
            display,
            skin,
            paths,
            colors: ColorTable::new(),
            skin_resolution,
            fontset_unicode: false,
            device: DeviceLossCoordinator::new(),
            sink: None,
        }
    }

    /// Replace the glyph backend
    pub fn with_loader(mut self, loader: Box<dyn GlyphLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Receiver for the resize broadcast issued after a device reset
    pub fn set_notification_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sink = Some(sink);
    }

    // ========================================================================
    // Font-set loading
    // ========================================================================

    /// Open the skin's font document for the active display
    fn open_font_document(&mut self) -> FontResult<FontDocument> {
        let (path, resolution) = self.skin.skin_path(FONT_DOCUMENT, &self.display.resolution());
        self.skin_resolution = resolution;
        FontDocument::open(&path)
    }

    /// Load every font of the named font-set (or the first unicode set).
    /// Returns the number of fonts available from the set.
    pub fn load_fonts(&mut self, font_set: &str) -> FontResult<usize> {
        let doc = self.open_font_document().map_err(|e| {
            error!("{}", e);
            e
        })?;
        self.colors = self.skin.colors();
        self.load_fonts_from_document(&doc, font_set)
    }

    /// Load a font-set from an already parsed document
    pub fn load_fonts_from_document(
        &mut self,
        doc: &FontDocument,
        font_set: &str,
    ) -> FontResult<usize> {
        let set = match doc.select_font_set(font_set) {
            Ok(set) => set,
            Err(e) => {
                error!("{}", e);
                // A legacy document says nothing about the loaded set
                if matches!(e, FontError::FontSetNotFound(_)) {
                    self.fontset_unicode = false;
                }
                return Err(e);
            }
        };
        self.fontset_unicode = true;

        let mut loaded = 0;
        for decl in &set.fonts {
            let request = TtfRequest::from_declaration(decl, &self.colors);
            if self.load_ttf(&request).is_some() {
                loaded += 1;
            }
        }
        info!(
            "Font-set '{}': {} of {} fonts loaded",
            set.id.as_deref().unwrap_or(""),
            loaded,
            set.fonts.len()
        );
        Ok(loaded)
    }

    /// Id of the skin's first unicode font-set
    pub fn first_unicode_font_set(&mut self) -> Option<String> {
        match self.open_font_document() {
            Ok(doc) => match doc.first_unicode_font_set() {
                Ok(id) => id.map(str::to_string),
                Err(e) => {
                    error!("{}", e);
                    None
                }
            },
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    /// Whether the skin declares `name` as a unicode font-set
    pub fn is_font_set_unicode(&mut self, name: &str) -> bool {
        self.open_font_document()
            .map(|doc| doc.is_font_set_unicode(name))
            .unwrap_or(false)
    }

    /// Whether the currently loaded font-set is unicode
    pub fn fontset_unicode(&self) -> bool {
        self.fontset_unicode
    }

    // ========================================================================
    // Font creation
    // ========================================================================

    /// Get or create a font.
    ///
    /// An existing font with the same name is returned unchanged. If the
    /// glyph file can't be loaded, the bundled fallback file is tried once;
    /// None means the font is unavailable and nothing should be drawn.
    pub fn load_ttf(&mut self, request: &TtfRequest) -> Option<FontHandle> {
        if let Some(existing) = self.registry.lookup(&request.font_name, false) {
            return Some(existing);
        }

        let source = request.source.unwrap_or(self.skin_resolution);
        let (size, aspect) = rescale_size_and_aspect(
            request.size as f32,
            request.aspect,
            &source,
            request.preserve_aspect,
            self.display.as_ref(),
        );
        let params = RasterParams {
            size,
            aspect,
            border: request.border,
        };

        let mut tried = HashSet::new();
        let mut file_name = request.file_name.clone();
        loop {
            tried.insert(file_name.clone());
            let path = self.paths.resolve(&file_name);
            let key = RasterizerKey::new(&file_name, &params);

            match self.cache.get_or_load(key, &path, &params, self.loader.as_ref()) {
                Ok(rasterizer) => {
                    let font = Font::new(
                        &request.font_name,
                        request.style,
                        request.text_color,
                        request.shadow_color,
                        request.line_spacing,
                        request.size as f32,
                        rasterizer,
                    );
                    let origin = OriginalFontSpec {
                        size: request.size,
                        aspect: request.aspect,
                        path,
                        file_name,
                        source,
                        preserve_aspect: request.preserve_aspect,
                        border: request.border,
                    };
                    debug!("Created font '{}' ({})", request.font_name, origin.file_name);
                    return Some(self.registry.create(font, origin));
                }
                // The substitute keeps the request's source resolution and
                // preserve-aspect flag, so it renders at the same device size
                Err(e) if !tried.contains(FALLBACK_GLYPH_FILE) => {
                    error!(
                        "Couldn't load font name: {}({}), trying to substitute {}: {}",
                        request.font_name, file_name, FALLBACK_GLYPH_FILE, e
                    );
                    file_name = FALLBACK_GLYPH_FILE.to_string();
                }
                Err(e) => {
                    error!(
                        "Couldn't load font name:{} file:{}: {}",
                        request.font_name,
                        path.display(),
                        e
                    );
                    return None;
                }
            }
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Find a font by name, optionally falling back to the default font
    pub fn get_font(&self, name: &str, fallback: bool) -> Option<FontHandle> {
        self.registry.lookup(name, fallback)
    }

    pub fn font(&self, handle: FontHandle) -> FontResult<&Font> {
        self.registry.get(handle)
    }

    /// The default font, or its bordered variant (created on first request)
    pub fn default_font(&mut self, border: bool) -> Option<FontHandle> {
        let default = self.registry.default_font()?;
        if !border {
            return Some(default);
        }
        if let Some(bordered) = self.registry.lookup(DEFAULT_BORDER_FONT_NAME, false) {
            return Some(bordered);
        }

        let style = self.registry.get(default).ok()?.style();
        let origin = self.registry.origin(default).ok()?;
        let request = TtfRequest {
            text_color: BORDER_TEXT_COLOR,
            shadow_color: 0,
            style,
            border: true,
            line_spacing: 1.0,
            aspect: origin.aspect,
            source: Some(origin.source),
            preserve_aspect: origin.preserve_aspect,
            ..TtfRequest::new(DEFAULT_BORDER_FONT_NAME, &origin.file_name, origin.size)
        };
        self.load_ttf(&request)
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Remove one font by exact name
    pub fn unload(&mut self, name: &str) {
        self.registry.unload(name);
    }

    /// Drop every font and rasterizer (skin switch)
    pub fn clear(&mut self) {
        self.registry.clear();
        self.cache.clear();
        self.fontset_unicode = false;
    }

    // ========================================================================
    // Device loss / resolution change
    // ========================================================================

    /// React to renderer and resize notifications.
    /// Returns true if the message was handled.
    pub fn on_message(&mut self, message: &GuiMessage) -> bool {
        // Failures are logged by the reload pass
        match self.device.on_message(message) {
            DeviceAction::Ignore => false,
            DeviceAction::Suspend => true,
            DeviceAction::Reload => {
                let _ = self.reload_ttf_fonts();
                true
            }
            DeviceAction::Rebuild => {
                let _ = self.rebuild_ttf_fonts();
                self.broadcast(Notification::WindowResize);
                true
            }
        }
    }

    pub fn device_state(&self) -> DeviceState {
        self.device.state()
    }

    /// Rescale every font for the current display from its original
    /// parameters. Rasterizers already cached for the new key are reused.
    /// Font handles stay valid.
    ///
    /// Stops at the first load failure; fonts not reached yet keep their
    /// previous rasterizer.
    pub fn reload_ttf_fonts(&mut self) -> FontResult<usize> {
        self.reload_rasterizers(false)
    }

    /// Like `reload_ttf_fonts`, but every rasterizer is loaded again into a
    /// fresh cache, since the ones created before a device loss are unusable.
    /// Fonts with equal keys still share one rasterizer.
    pub fn rebuild_ttf_fonts(&mut self) -> FontResult<usize> {
        self.reload_rasterizers(true)
    }

    fn reload_rasterizers(&mut self, rebuild: bool) -> FontResult<usize> {
        if self.registry.is_empty() {
            return Ok(0);
        }

        let mut fresh = RasterizerCache::new();
        let mut reloaded = 0;
        let mut failure = None;
        for handle in self.registry.handles() {
            let origin = self.registry.origin(handle)?;
            let (size, aspect) = rescale_size_and_aspect(
                origin.size as f32,
                origin.aspect,
                &origin.source,
                origin.preserve_aspect,
                self.display.as_ref(),
            );
            let params = RasterParams {
                size,
                aspect,
                border: origin.border,
            };
            let key = RasterizerKey::new(&origin.file_name, &params);
            let path = origin.path.clone();

            let cache = if rebuild { &mut fresh } else { &mut self.cache };
            match cache.get_or_load(key, &path, &params, self.loader.as_ref()) {
                Ok(rasterizer) => {
                    self.registry.rebind(handle, rasterizer)?;
                    reloaded += 1;
                }
                Err(e) => {
                    error!("Couldn't re-load font file:{}: {}", path.display(), e);
                    failure = Some(e);
                    break;
                }
            }
        }

        // Fonts not reached keep the old rasterizer alive through their Rc
        if rebuild {
            self.cache = fresh;
        }
        let freed = self.cache.collect_unreferenced();
        if let Some(e) = failure {
            return Err(e);
        }
        info!("Reloaded {} fonts ({} font files freed)", reloaded, freed);
        Ok(reloaded)
    }

    fn broadcast(&mut self, notification: Notification) {
        match self.sink.as_mut() {
            Some(sink) => sink.notify_all(notification),
            None => warn!("No notification sink for {:?}", notification),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Glyph files offered in settings as (label, value) pairs
    pub fn font_file_options(&self) -> Vec<(String, String)> {
        self.paths.font_file_options()
    }

    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &RasterizerCache {
        &self.cache
    }

    pub fn skin_resolution(&self) -> ResolutionInfo {
        self.skin_resolution
    }
}
