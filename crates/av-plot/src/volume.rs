//! Volume scene resolution.

use crate::camera::{self, CameraGeometry, Lens};
use crate::error::{PlotError, PlotResult};
use crate::resolve::PlotWidth;
use crate::transfer::{TransferBounds, TransferFunction};
use av_core::{FieldId, Triple, to_code_length};
use av_dataset::Dataset;
use av_params::{PlotConfig, PlotParams};
use serde::Serialize;
use tracing::debug;

pub const BOX_FRAME_COLOR: [f64; 4] = [0.2, 0.2, 0.2, 0.1];

/// Saved images clip highlights at this many standard deviations.
pub const SIGMA_CLIP: f64 = 3.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxFrame {
    pub left: Triple,
    pub right: Triple,
    pub color: [f64; 4],
}

/// Everything the renderer needs to composite one volume image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeScene {
    pub field: FieldId,
    pub transfer: TransferFunction,
    pub camera: CameraGeometry,
    /// The user's zoom as given, before conversion to code length.
    pub requested_width: Option<PlotWidth>,
    pub box_frame: Option<BoxFrame>,
    pub sigma_clip: f64,
}

/// Resolve the scene for `field`.
///
/// Data extrema are only read when a color bound is missing.
pub fn resolve_volume(
    dataset: &Dataset,
    field: FieldId,
    params: &PlotParams,
    config: &PlotConfig,
) -> PlotResult<VolumeScene> {
    let (lo, hi) = match (params.vmin, params.vmax) {
        (Some(lo), Some(hi)) => (lo, hi),
        (vmin, vmax) => {
            let (data_lo, data_hi) = dataset.field_extrema(&field)?;
            debug!(field = %field, data_lo, data_hi, "volume bounds from data");
            (vmin.unwrap_or(data_lo), vmax.unwrap_or(data_hi))
        }
    };
    let bounds = TransferBounds::new(lo, hi, params.log_scale)?;

    let vol = &params.volume;
    let transfer = TransferFunction::new(
        bounds,
        &params.cmap,
        vol.n_layers,
        (vol.alpha_min, vol.alpha_max),
        vol.grey_opacity,
    );

    let requested_width = params.width.resolved().map(|(value, unit)| PlotWidth {
        value,
        unit: unit.to_string(),
    });
    let explicit_width = requested_width
        .as_ref()
        .map(|w| {
            to_code_length(w.value, &w.unit, dataset.meta().length_unit_cm).map_err(|source| {
                PlotError::InvalidUnit {
                    unit: w.unit.clone(),
                    source,
                }
            })
        })
        .transpose()?;

    let lens = if config.use_perspective_camera.unwrap_or(vol.use_perspective) {
        Lens::Perspective
    } else {
        Lens::PlaneParallel
    };
    let camera = CameraGeometry::resolve(
        vol.camera_theta,
        vol.camera_phi,
        &dataset.domain_width(),
        dataset.domain_center(),
        explicit_width,
        lens,
        camera::resolution(vol.preview, params.short_size, params.dpi),
    );

    let box_frame = vol.show_box_frame.then(|| BoxFrame {
        left: dataset.domain_left_edge(),
        right: dataset.domain_right_edge(),
        color: BOX_FRAME_COLOR,
    });

    Ok(VolumeScene {
        field,
        transfer,
        camera,
        requested_width,
        box_frame,
        sigma_clip: SIGMA_CLIP,
    })
}
