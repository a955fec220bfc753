//! Overlays drawn on top of a 2D plot.
//!
//! [`build_annotations`] emits them in drawing order: particles, grid
//! boundaries, timestamp, scale bar, corner texts. Later entries are drawn
//! over earlier ones, so the order is part of the contract.

use av_dataset::Dataset;
use av_params::{AnnotationParams, ParticleParams, ScaleBarParams};
use serde::Serialize;
use tracing::debug;

pub const SCALE_BAR_MIN_FRAC: f64 = 0.05;
pub const SCALE_BAR_MAX_FRAC: f64 = 0.16;
pub const SCALE_BAR_PAD: f64 = 0.55;
pub const SCALE_BAR_SEP: f64 = 8.0;
pub const SCALE_BAR_BORDERPAD: f64 = 5.0;

const TEXT_COLOR: &str = "white";
const GRID_COLOR: &str = "white";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    UpperLeft,
    UpperRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VAlign {
    Top,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleLength {
    pub value: f64,
    pub unit: String,
}

/// Scale bar in axis-fraction coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleBar {
    /// Fixed physical length, or `None` to let the renderer pick one.
    pub length: Option<ScaleLength>,
    pub position: [f64; 2],
    pub min_frac: f64,
    pub max_frac: f64,
    pub pad: f64,
    pub sep: f64,
    pub borderpad: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    Particles {
        ptype: String,
        /// Slab thickness around the plane, in code length.
        depth: f64,
        marker_size: u32,
        color: String,
        marker: String,
    },
    Grids {
        edge_color: String,
        linewidth: f64,
    },
    Timestamp {
        corner: Corner,
        time: f64,
    },
    ScaleBar(ScaleBar),
    Text {
        position: [f64; 2],
        text: String,
        color: String,
        horizontal: HAlign,
        vertical: VAlign,
    },
}

/// One overlay per requested particle type that actually has particles.
///
/// Unknown types, empty types and types whose positions cannot be read are
/// skipped without error.
pub fn particle_overlays(dataset: &Dataset, params: &ParticleParams) -> Vec<Annotation> {
    let depth = dataset.domain_width()[0] * params.depth_fraction;
    params
        .types
        .iter()
        .filter(|ptype| match dataset.particle_count(ptype) {
            None => {
                debug!(ptype = ptype.as_str(), "particle type not in registry, skipped");
                false
            }
            Some(0) => {
                debug!(ptype = ptype.as_str(), "no particles of this type, skipped");
                false
            }
            Some(_) => match dataset.particle_positions(ptype) {
                Ok(positions) => !positions.is_empty(),
                Err(err) => {
                    debug!(ptype = ptype.as_str(), error = %err, "particle positions unreadable, skipped");
                    false
                }
            },
        })
        .map(|ptype| Annotation::Particles {
            ptype: ptype.clone(),
            depth,
            marker_size: params.size,
            color: params.color.clone(),
            marker: params.marker.clone(),
        })
        .collect()
}

/// Scale bar for the given image aspect, if one was asked for.
pub fn scale_bar(params: &ScaleBarParams, aspect: f64) -> Option<ScaleBar> {
    let length = params.fixed_size().map(|(value, unit)| ScaleLength {
        value,
        unit: unit.to_string(),
    });
    if length.is_none() && !params.show {
        return None;
    }
    Some(ScaleBar {
        length,
        position: params
            .position
            .unwrap_or_else(|| crate::layout::scale_bar_anchor(aspect)),
        min_frac: SCALE_BAR_MIN_FRAC,
        max_frac: SCALE_BAR_MAX_FRAC,
        pad: SCALE_BAR_PAD,
        sep: SCALE_BAR_SEP,
        borderpad: SCALE_BAR_BORDERPAD,
        color: params.color.clone(),
    })
}

fn corner_text(text: &Option<String>, corner: Corner) -> Option<Annotation> {
    let text = text.as_deref().filter(|t| !t.is_empty())?;
    let (position, horizontal) = match corner {
        Corner::UpperLeft => ([0.02, 0.98], HAlign::Left),
        Corner::UpperRight => ([0.98, 0.98], HAlign::Right),
    };
    Some(Annotation::Text {
        position,
        text: text.to_string(),
        color: TEXT_COLOR.to_string(),
        horizontal,
        vertical: VAlign::Top,
    })
}

/// All overlays for a 2D plot, in drawing order.
pub fn build_annotations(
    dataset: &Dataset,
    particles: &ParticleParams,
    annotations: &AnnotationParams,
    scale: &ScaleBarParams,
    aspect: f64,
) -> Vec<Annotation> {
    let mut out = particle_overlays(dataset, particles);

    if annotations.show_grids {
        out.push(Annotation::Grids {
            edge_color: GRID_COLOR.to_string(),
            linewidth: 1.0,
        });
    }
    if annotations.show_timestamp {
        out.push(Annotation::Timestamp {
            corner: Corner::UpperLeft,
            time: dataset.current_time(),
        });
    }
    if let Some(bar) = scale_bar(scale, aspect) {
        out.push(Annotation::ScaleBar(bar));
    }
    out.extend(corner_text(&annotations.top_left_text, Corner::UpperLeft));
    out.extend(corner_text(&annotations.top_right_text, Corner::UpperRight));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_scale_bar_unless_requested() {
        assert_eq!(scale_bar(&ScaleBarParams::default(), 1.0), None);
    }

    #[test]
    fn auto_sized_scale_bar() {
        let params = ScaleBarParams {
            show: true,
            ..ScaleBarParams::default()
        };
        let bar = scale_bar(&params, 2.0).unwrap();
        assert_eq!(bar.length, None);
        assert_eq!(bar.position, [0.5, 0.1]);
        assert_eq!(bar.min_frac, 0.05);
        assert_eq!(bar.max_frac, 0.16);
    }

    #[test]
    fn fixed_scale_bar_does_not_need_show() {
        let params = ScaleBarParams {
            size: Some(10.0),
            unit: Some("pc".into()),
            ..ScaleBarParams::default()
        };
        let bar = scale_bar(&params, 0.5).unwrap();
        assert_eq!(
            bar.length,
            Some(ScaleLength {
                value: 10.0,
                unit: "pc".into()
            })
        );
        assert_eq!(bar.position, [0.15, 0.15]);
    }

    #[test]
    fn explicit_position_wins() {
        let params = ScaleBarParams {
            show: true,
            position: Some([0.8, 0.9]),
            ..ScaleBarParams::default()
        };
        assert_eq!(scale_bar(&params, 2.0).unwrap().position, [0.8, 0.9]);
    }

    #[test]
    fn corner_text_alignment() {
        let Some(Annotation::Text {
            position,
            horizontal,
            ..
        }) = corner_text(&Some("t = 1 Myr".into()), Corner::UpperRight)
        else {
            panic!("expected text annotation");
        };
        assert_eq!(position, [0.98, 0.98]);
        assert_eq!(horizontal, HAlign::Right);
        assert_eq!(corner_text(&Some(String::new()), Corner::UpperLeft), None);
    }
}
