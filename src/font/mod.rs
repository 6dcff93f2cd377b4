//! Skin font management
//!
//! Handles:
//! - Font-set selection from the skin's Font.xml
//! - Glyph file resolution (skin, user and system font directories)
//! - Resolution-dependent rescaling of font size and aspect
//! - Rasterizer sharing between fonts with identical parameters
//! - Reloading rasterizers after device loss or a mode change

pub mod device;
pub mod fontset;
pub mod manager;
pub mod path;
pub mod rasterizer;
pub mod registry;
pub mod rescale;

pub use device::{
    DeviceAction, DeviceLossCoordinator, DeviceState, GuiMessage, Notification, NotificationSink,
};
pub use fontset::{FontDeclaration, FontDocument};
pub use manager::{FontManager, TtfRequest};
pub use path::FontPaths;
pub use rasterizer::{
    FontdueLoader, GlyphBitmap, GlyphFace, GlyphLoader, RasterParams, Rasterizer, RasterizerCache,
    RasterizerKey,
};
pub use registry::{Font, FontHandle, FontRegistry, OriginalFontSpec};
pub use rescale::rescale_size_and_aspect;

use bitflags::bitflags;

bitflags! {
    /// Font style flags, combinable
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontStyle: u32 {
        const BOLD = 1;
        const ITALICS = 1 << 1;
        const UPPERCASE = 1 << 2;
        const LOWERCASE = 1 << 3;
    }
}

impl FontStyle {
    /// Parse whitespace-separated style tokens.
    /// `bolditalics` is accepted for older skins; unknown tokens are ignored.
    pub fn from_tokens(tokens: &str) -> Self {
        tokens
            .split_whitespace()
            .fold(Self::empty(), |style, token| match token {
                "bold" => style | Self::BOLD,
                "italics" => style | Self::ITALICS,
                "bolditalics" => style | Self::BOLD | Self::ITALICS,
                "uppercase" => style | Self::UPPERCASE,
                "lowercase" => style | Self::LOWERCASE,
                _ => style,
            })
    }
}
