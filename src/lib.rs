//! skinfont - skin font manager
//!
//! Loads the fonts a GUI skin declares, shares rasterizers between fonts
//! with identical device parameters and rebuilds them when the display
//! resolution changes or the rendering device is reset.
//!
//! ```text
//! Font.xml ─► FontDocument ─► FontManager ─► FontRegistry (name → Font)
//!                                 │                 │
//!                      DisplayScaling (rescale)     ▼
//!                                 └──────► RasterizerCache (key → Rasterizer)
//! ```

pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod font;
pub mod skin;
pub mod utils;

pub use config::Config;
pub use display::{Display, DisplayScaling, ResolutionInfo};
pub use error::{FontError, FontResult};
pub use font::{FontHandle, FontManager, TtfRequest};
pub use skin::Skin;
