//! Slice and projection configuration.

use crate::annotate::{self, Annotation};
use crate::color::ColorRange;
use crate::layout::{self, FigureLayout};
use av_core::{FieldId, Triple, parse_unit};
use av_dataset::{Axis, Dataset};
use av_params::{ColorbarOrientation, PlotConfig, PlotParams};
use serde::Serialize;
use tracing::warn;

/// What the 2D plot samples on its plane.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaneSelection {
    Slice { coord: f64 },
    Projection { weight: Option<FieldId> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotWidth {
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorbarSpec {
    /// Replaces the renderer's default field label when set.
    pub label: Option<String>,
    pub orientation: ColorbarOrientation,
}

/// Everything the renderer needs to draw one slice or projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPlot {
    pub selection: PlaneSelection,
    pub axis: Axis,
    pub field: FieldId,
    pub center: Triple,
    pub cmap: String,
    pub log_scale: bool,
    pub color_range: Option<ColorRange>,
    pub field_unit: Option<String>,
    pub background_color: String,
    pub width: Option<PlotWidth>,
    /// `None` hides the colorbar.
    pub colorbar: Option<ColorbarSpec>,
    pub figure: FigureLayout,
    pub annotations: Vec<Annotation>,
}

impl ResolvedPlot {
    /// Copy whose colorbar is labelled with the bare field name.
    pub fn with_bare_labels(&self) -> Self {
        let mut plot = self.clone();
        if let Some(colorbar) = plot.colorbar.as_mut() {
            colorbar.label = Some(plot.field.name().to_string());
        }
        plot
    }
}

pub struct PlotResolver<'a> {
    dataset: &'a Dataset,
    config: &'a PlotConfig,
}

impl<'a> PlotResolver<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a PlotConfig) -> Self {
        Self { dataset, config }
    }

    pub fn resolve(
        &self,
        selection: PlaneSelection,
        axis: Axis,
        field: FieldId,
        params: &PlotParams,
    ) -> ResolvedPlot {
        let aspect = self.dataset.axis_info(axis).aspect();
        let width = params.width.resolved().map(|(value, unit)| PlotWidth {
            value,
            unit: unit.to_string(),
        });
        let is_squared = width.is_some();

        let (field_unit, unit_failed) = match params.field_unit.as_deref() {
            Some(unit) => match parse_unit(unit) {
                Ok(_) => (Some(unit.to_string()), false),
                Err(err) => {
                    warn!(field = %field, unit, error = %err, "unusable display unit, keeping native units");
                    (None, true)
                }
            },
            None => (None, false),
        };

        let colorbar = params.colorbar.show.then(|| ColorbarSpec {
            label: params.colorbar.label.clone().or_else(|| {
                unit_failed.then(|| field.name().to_string())
            }),
            orientation: params.colorbar.orientation,
        });

        let figure = FigureLayout {
            aspect,
            is_squared,
            size_inches: layout::figure_size(params.short_size, aspect, is_squared),
            font_size: params.font_size,
            dpi: params.dpi,
            show_axes: params.show_axes,
            colorbar_fraction: self.config.colormap_fraction,
            scale_bar_height_fraction: self.config.scale_bar_height_fraction,
            tight_bbox: true,
            pad_inches: layout::SAVE_PAD_INCHES,
        };

        let annotations = annotate::build_annotations(
            self.dataset,
            &params.particles,
            &params.annotations,
            &params.scale_bar,
            aspect,
        );

        ResolvedPlot {
            selection,
            axis,
            field,
            center: self.dataset.domain_center(),
            cmap: params.cmap.clone(),
            log_scale: params.log_scale,
            color_range: ColorRange::from_bounds(params.vmin, params.vmax),
            field_unit,
            background_color: params.background_color.clone(),
            width,
            colorbar,
            figure,
            annotations,
        }
    }
}
