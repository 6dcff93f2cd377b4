//! Display resolution and GUI scaling
//!
//! The font manager never reads display state from globals: a
//! `DisplayScaling` provider is injected and queried on every rescale.

use log::info;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Resolution descriptor (active display mode or a skin's authoring resolution)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel aspect ratio (1.0 = square pixels)
    pub pixel_ratio: f32,
}

impl ResolutionInfo {
    pub const fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }
}

impl Default for ResolutionInfo {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}

/// Provider of the active display's GUI scaling
pub trait DisplayScaling {
    /// Horizontal and vertical factors mapping `source` coordinates onto
    /// the active display (source extent / display extent)
    fn gui_scaling(&self, source: &ResolutionInfo) -> (f32, f32);

    /// Active display resolution
    fn resolution(&self) -> ResolutionInfo;
}

/// Display state owned by the windowing side
///
/// Interior mutability lets the owner switch modes while the font
/// manager holds a shared reference.
#[derive(Debug)]
pub struct Display {
    resolution: Cell<ResolutionInfo>,
    /// Skin zoom in percent (0 = none, 10 = 10% larger)
    zoom: Cell<i32>,
}

impl Display {
    pub fn new(resolution: ResolutionInfo) -> Self {
        Self {
            resolution: Cell::new(resolution),
            zoom: Cell::new(0),
        }
    }

    pub fn with_zoom(resolution: ResolutionInfo, zoom: i32) -> Self {
        let display = Self::new(resolution);
        display.zoom.set(zoom);
        display
    }

    /// Switch display mode (callers follow up with a WindowResize notification)
    pub fn set_resolution(&self, resolution: ResolutionInfo) {
        info!(
            "Display mode: {}x{} (pixel ratio {})",
            resolution.width, resolution.height, resolution.pixel_ratio
        );
        self.resolution.set(resolution);
    }
}

impl DisplayScaling for Display {
    fn gui_scaling(&self, source: &ResolutionInfo) -> (f32, f32) {
        let active = self.resolution.get();
        let mut to_width = active.width as f32;
        let mut to_height = active.height as f32;

        // Zoom is given in the vertical direction, so correct it for the pixel ratio
        let zoom = (100 + self.zoom.get()) as f32 * 0.01 - 1.0;
        to_width *= zoom + 1.0;
        let pixel_ratio = if active.pixel_ratio > 0.0 {
            active.pixel_ratio
        } else {
            1.0
        };
        to_height *= zoom / pixel_ratio + 1.0;

        if to_width <= 0.0 || to_height <= 0.0 {
            return (1.0, 1.0);
        }
        (source.width as f32 / to_width, source.height as f32 / to_height)
    }

    fn resolution(&self) -> ResolutionInfo {
        self.resolution.get()
    }
}
