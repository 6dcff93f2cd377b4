//! Resolution-dependent font rescaling
//!
//! Fonts are rasterized to bitmaps once instead of being scaled at
//! render time (which would alias), so size and aspect are converted to
//! device values up front and again after every mode change.

use crate::display::{DisplayScaling, ResolutionInfo};

/// Map a nominal (size, aspect) authored for `source` onto the active display.
///
/// With `preserve_aspect` the font keeps its shape on anisotropic pixels;
/// otherwise it stretches with the rest of the GUI.
pub fn rescale_size_and_aspect(
    size: f32,
    aspect: f32,
    source: &ResolutionInfo,
    preserve_aspect: bool,
    display: &dyn DisplayScaling,
) -> (f32, f32) {
    // Degenerate resolutions leave the font unscaled
    let (scale_x, scale_y) = match display.gui_scaling(source) {
        (x, y) if x > 0.0 && y > 0.0 && x.is_finite() && y.is_finite() => (x, y),
        _ => (1.0, 1.0),
    };

    let aspect = if preserve_aspect {
        let pixel_ratio = display.resolution().pixel_ratio;
        if pixel_ratio > 0.0 {
            aspect / pixel_ratio
        } else {
            aspect
        }
    } else {
        aspect * source.pixel_ratio * (scale_y / scale_x)
    };

    (size / scale_y, aspect)
}
