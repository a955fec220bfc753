//! Figure sizing and scale-bar placement from the image aspect ratio.
//!
//! The constants here are tuned by eye; keep them exactly as they are so
//! figures stay comparable between versions.

use serde::Serialize;

/// Aspect ratios strictly inside this band count as close to square.
pub const SQUARE_BAND: (f64, f64) = (3.0 / 4.1, 4.1 / 3.0);

/// Growth applied to near-square and explicitly squared figures.
pub const SQUARE_BOOST: f64 = 1.5;

/// Above this aspect the scale bar moves to the horizontal centre.
pub const TALL_ASPECT: f64 = 1.3;

pub const SAVE_PAD_INCHES: f64 = 0.05;

pub fn is_close_to_square(aspect: f64) -> bool {
    SQUARE_BAND.0 < aspect && aspect < SQUARE_BAND.1
}

/// Long side of the figure in inches.
///
/// `aspect` is image height over width; `is_squared` is set when an explicit
/// zoom width forces a square view.
pub fn figure_size(short_size: f64, aspect: f64, is_squared: bool) -> f64 {
    if is_squared {
        return short_size * SQUARE_BOOST;
    }
    let boost = if is_close_to_square(aspect) {
        SQUARE_BOOST
    } else {
        1.0
    };
    if aspect > 1.0 {
        short_size * aspect * boost
    } else {
        short_size / aspect * boost
    }
}

/// Scale-bar anchor in axis-fraction coordinates.
pub fn scale_bar_anchor(aspect: f64) -> [f64; 2] {
    let x = if aspect > TALL_ASPECT { 0.5 } else { 0.15 };
    let y = if aspect < 1.0 / TALL_ASPECT { 0.15 } else { 0.1 };
    [x, y]
}

/// Figure-level settings handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    /// Image height over width of the plotted region.
    pub aspect: f64,
    pub is_squared: bool,
    pub size_inches: f64,
    pub font_size: u32,
    pub dpi: u32,
    /// Axes hidden means ticks and labels go, the frame stays.
    pub show_axes: bool,
    pub colorbar_fraction: f64,
    pub scale_bar_height_fraction: f64,
    pub tight_bbox: bool,
    pub pad_inches: f64,
}
