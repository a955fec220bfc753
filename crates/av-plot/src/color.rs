//! Color-scale limits.

use serde::Serialize;

/// One end of a color range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    /// Follow the plotted data's own extreme on this side.
    Data,
    Fixed(f64),
}

/// Possibly half-open color range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorRange {
    pub min: Limit,
    pub max: Limit,
}

impl ColorRange {
    /// `None` when neither bound is given: the renderer autoscales.
    pub fn from_bounds(vmin: Option<f64>, vmax: Option<f64>) -> Option<Self> {
        let side = |v: Option<f64>| v.map_or(Limit::Data, Limit::Fixed);
        match (vmin, vmax) {
            (None, None) => None,
            _ => Some(Self {
                min: side(vmin),
                max: side(vmax),
            }),
        }
    }
}
