//! Transfer-function bounds and layers for volume rendering.

use crate::error::{PlotError, PlotResult};
use serde::Serialize;

/// Gaussian layer width as a fraction of the scaled range.
pub const LAYER_WIDTH_FRACTION: f64 = 0.002;

/// Data bounds plus the bounds in the space the transfer function works in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferBounds {
    pub data: [f64; 2],
    /// `log10` of `data` under log scaling, otherwise equal to it.
    pub scaled: [f64; 2],
    pub log: bool,
}

impl TransferBounds {
    pub fn new(lo: f64, hi: f64, log: bool) -> PlotResult<Self> {
        let invalid = |reason| {
            Err(PlotError::InvalidRange {
                vmin: lo,
                vmax: hi,
                reason,
            })
        };
        if !(lo.is_finite() && hi.is_finite()) {
            return invalid("bounds must be finite");
        }
        if lo > hi {
            return invalid("vmin exceeds vmax");
        }
        if log && (lo <= 0.0 || hi <= 0.0) {
            return invalid("log scale needs positive bounds");
        }

        let scaled = if log {
            [lo.log10(), hi.log10()]
        } else {
            [lo, hi]
        };
        Ok(Self {
            data: [lo, hi],
            scaled,
            log,
        })
    }

    pub fn span(&self) -> f64 {
        self.scaled[1] - self.scaled[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferLayer {
    /// Position in scaled units.
    pub center: f64,
    pub width: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferFunction {
    pub bounds: TransferBounds,
    pub colormap: String,
    pub grey_opacity: bool,
    pub layers: Vec<TransferLayer>,
}

impl TransferFunction {
    pub fn new(
        bounds: TransferBounds,
        colormap: &str,
        n_layers: u32,
        alpha: (f64, f64),
        grey_opacity: bool,
    ) -> Self {
        Self {
            bounds,
            colormap: colormap.to_string(),
            grey_opacity,
            layers: layers(&bounds, n_layers, alpha),
        }
    }
}

/// Evenly spaced layers strictly inside the scaled range, opacity ramping
/// from `alpha.0` at the lowest to `alpha.1` at the highest.
pub fn layers(bounds: &TransferBounds, n: u32, (alpha_min, alpha_max): (f64, f64)) -> Vec<TransferLayer> {
    let [lo, _] = bounds.scaled;
    let span = bounds.span();
    let step = span / (f64::from(n) + 1.0);
    let width = LAYER_WIDTH_FRACTION * span;

    (0..n)
        .map(|i| {
            let alpha = if n > 1 {
                alpha_min + (alpha_max - alpha_min) * f64::from(i) / f64::from(n - 1)
            } else {
                alpha_max
            };
            TransferLayer {
                center: lo + step * f64::from(i + 1),
                width,
                alpha,
            }
        })
        .collect()
}
