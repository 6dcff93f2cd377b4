//! Global constants for skinfont
//!
//! Well-known font names, file names and defaults shared by the
//! skin loader, the registry and the reload path.

// ============================================================================
// Font Names
// ============================================================================

/// Name of the skin's default font (used for fallback lookups)
pub const DEFAULT_FONT_NAME: &str = "font13";

/// Name under which the bordered variant of the default font is cached
pub const DEFAULT_BORDER_FONT_NAME: &str = "__defaultborder__";

/// Sentinel meaning "no font"; never falls back to the default
pub const NO_FONT_NAME: &str = "-";

// ============================================================================
// Glyph Files
// ============================================================================

/// Bundled glyph file substituted when a requested file fails to load
pub const FALLBACK_GLYPH_FILE: &str = "arial.ttf";

/// Recognized glyph-file extension (compared case-insensitively)
pub const GLYPH_FILE_EXTENSION: &str = ".ttf";

/// Skin-relative directory holding glyph files
pub const SKIN_FONT_DIR: &str = "fonts";

// ============================================================================
// Skin Documents
// ============================================================================

/// Font-definition document looked up in the skin resolution folders
pub const FONT_DOCUMENT: &str = "Font.xml";

/// Skin color table, relative to the skin root
pub const COLOR_DOCUMENT: &str = "colors/defaults.xml";

// ============================================================================
// Font Declaration Defaults
// ============================================================================

/// Nominal size used when a declaration omits it or gives a non-positive value
pub const DEFAULT_FONT_SIZE: i32 = 20;

/// Default line spacing multiplier
pub const DEFAULT_LINE_SPACING: f32 = 1.0;

/// Default nominal aspect
pub const DEFAULT_ASPECT: f32 = 1.0;

/// Text color of the lazily created bordered default font (opaque black)
pub const BORDER_TEXT_COLOR: u32 = 0xFF00_0000;
