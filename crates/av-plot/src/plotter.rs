//! Entry point: requests in, plans or image bytes out.

use crate::error::{PlotError, PlotResult};
use crate::render::{RenderError, Renderer};
use crate::resolve::{PlaneSelection, PlotResolver, ResolvedPlot};
use crate::volume::{self, VolumeScene};
use av_core::{FieldId, FieldSpec, normalize_field, normalize_weight_field};
use av_dataset::{Axis, Dataset, DatasetError};
use av_params::{PlotConfig, PlotParams};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Slice,
    Projection,
    Volume,
}

impl FromStr for PlotKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slc" | "slice" => Ok(PlotKind::Slice),
            "prj" | "projection" => Ok(PlotKind::Projection),
            "vol" | "volume" => Ok(PlotKind::Volume),
            _ => Err(PlotError::UnknownPlotKind {
                kind: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlotKind::Slice => "slice",
            PlotKind::Projection => "projection",
            PlotKind::Volume => "volume",
        };
        f.write_str(s)
    }
}

/// One plot as the caller asks for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub kind: PlotKind,
    /// Ignored for volume renders.
    pub axis: Axis,
    pub field: FieldSpec,
    /// Projections only.
    pub weight_field: Option<FieldSpec>,
    pub params: PlotParams,
    /// Slice position along `axis`; domain centre when absent.
    pub coord: Option<f64>,
}

impl PlotRequest {
    pub fn new(kind: PlotKind, axis: Axis, field: impl Into<FieldSpec>) -> Self {
        Self {
            kind,
            axis,
            field: field.into(),
            weight_field: None,
            params: PlotParams::default(),
            coord: None,
        }
    }

    pub fn slice(axis: Axis, field: impl Into<FieldSpec>) -> Self {
        Self::new(PlotKind::Slice, axis, field)
    }

    pub fn projection(axis: Axis, field: impl Into<FieldSpec>) -> Self {
        Self::new(PlotKind::Projection, axis, field)
    }

    pub fn volume(field: impl Into<FieldSpec>) -> Self {
        Self::new(PlotKind::Volume, Axis::Z, field)
    }

    pub fn with_params(mut self, params: PlotParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_coord(mut self, coord: f64) -> Self {
        self.coord = Some(coord);
        self
    }

    pub fn with_weight(mut self, weight: impl Into<FieldSpec>) -> Self {
        self.weight_field = Some(weight.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPlan {
    Plot(ResolvedPlot),
    Volume(VolumeScene),
}

/// Resolves requests against one dataset without rendering.
pub struct Planner<'a> {
    dataset: &'a Dataset,
    config: &'a PlotConfig,
}

impl<'a> Planner<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a PlotConfig) -> Self {
        Self { dataset, config }
    }

    pub fn plan(&self, request: &PlotRequest) -> PlotResult<RenderPlan> {
        let params = &request.params;
        params.validate()?;

        let field = normalize_field(&request.field)?;
        if !self.dataset.has_field(&field) {
            return Err(DatasetError::FieldNotFound { field }.into());
        }

        let selection = match request.kind {
            PlotKind::Volume => {
                let scene = volume::resolve_volume(self.dataset, field, params, self.config)?;
                return Ok(RenderPlan::Volume(scene));
            }
            PlotKind::Slice => PlaneSelection::Slice {
                coord: request
                    .coord
                    .unwrap_or_else(|| self.dataset.center_coordinate(request.axis)),
            },
            PlotKind::Projection => PlaneSelection::Projection {
                weight: normalize_weight_field(request.weight_field.as_ref()),
            },
        };

        check_log_limits(params)?;
        let plot = PlotResolver::new(self.dataset, self.config).resolve(
            selection,
            request.axis,
            field,
            params,
        );
        Ok(RenderPlan::Plot(plot))
    }
}

/// Explicit limits must be finite, and positive under log scaling.
fn check_log_limits(params: &PlotParams) -> PlotResult<()> {
    let (vmin, vmax) = (params.vmin, params.vmax);
    let invalid = |reason| PlotError::InvalidRange {
        vmin: vmin.unwrap_or(f64::NAN),
        vmax: vmax.unwrap_or(f64::NAN),
        reason,
    };
    for v in [vmin, vmax].into_iter().flatten() {
        if !v.is_finite() {
            return Err(invalid("bounds must be finite"));
        }
        if params.log_scale && v <= 0.0 {
            return Err(invalid("log scale needs positive bounds"));
        }
    }
    Ok(())
}

/// Min and max of one field over the whole domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldInfo {
    pub field: FieldId,
    pub min: f64,
    pub max: f64,
}

/// A dataset, its global configuration and a renderer.
///
/// Cheap to clone; every call is independent, so one plotter can serve
/// concurrent requests.
#[derive(Clone)]
pub struct Plotter<R> {
    dataset: Arc<Dataset>,
    config: PlotConfig,
    renderer: R,
}

impl<R: Renderer> Plotter<R> {
    pub fn new(dataset: Arc<Dataset>, config: PlotConfig, renderer: R) -> Self {
        Self {
            dataset,
            config,
            renderer,
        }
    }

    pub fn open(path: &Path, config: PlotConfig, renderer: R) -> PlotResult<Self> {
        let dataset = Dataset::open(path)?;
        Ok(Self::new(Arc::new(dataset), config, renderer))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn plan(&self, request: &PlotRequest) -> PlotResult<RenderPlan> {
        Planner::new(&self.dataset, &self.config).plan(request)
    }

    /// Resolve and draw `request`, returning PNG bytes.
    pub fn render(&self, request: &PlotRequest) -> PlotResult<Vec<u8>> {
        let plan = self.plan(request)?;
        info!(kind = %request.kind, field = ?request.field, "rendering");

        let result = match &plan {
            RenderPlan::Plot(plot) => match self.renderer.render_plot(&self.dataset, plot) {
                Err(RenderError::UnitLabel { label }) => {
                    warn!(label = %label, "label rejected by renderer, retrying with field name");
                    self.renderer
                        .render_plot(&self.dataset, &plot.with_bare_labels())
                }
                other => other,
            },
            RenderPlan::Volume(scene) => self.renderer.render_volume(&self.dataset, scene),
        };
        result.map_err(|e| PlotError::Render {
            message: e.to_string(),
        })
    }

    /// Render and write the bytes to `path`.
    pub fn render_to_path(&self, request: &PlotRequest, path: &Path) -> PlotResult<PathBuf> {
        let bytes = self.render(request)?;
        std::fs::write(path, bytes)?;
        Ok(path.to_path_buf())
    }

    pub fn slice(
        &self,
        field: impl Into<FieldSpec>,
        axis: Axis,
        coord: Option<f64>,
        params: Option<PlotParams>,
    ) -> PlotResult<Vec<u8>> {
        let mut request = PlotRequest::slice(axis, field).with_params(self.params_or_default(params));
        request.coord = coord;
        self.render(&request)
    }

    pub fn project(
        &self,
        field: impl Into<FieldSpec>,
        axis: Axis,
        weight_field: Option<FieldSpec>,
        params: Option<PlotParams>,
    ) -> PlotResult<Vec<u8>> {
        let mut request =
            PlotRequest::projection(axis, field).with_params(self.params_or_default(params));
        request.weight_field = weight_field;
        self.render(&request)
    }

    pub fn volume(
        &self,
        field: impl Into<FieldSpec>,
        params: Option<PlotParams>,
    ) -> PlotResult<Vec<u8>> {
        let request = PlotRequest::volume(field).with_params(self.params_or_default(params));
        self.render(&request)
    }

    pub fn available_fields(&self) -> Vec<FieldId> {
        self.dataset.fields()
    }

    pub fn field_info(&self, field: impl Into<FieldSpec>) -> PlotResult<FieldInfo> {
        let field = normalize_field(&field.into())?;
        let (min, max) = self.dataset.field_extrema(&field)?;
        Ok(FieldInfo { field, min, max })
    }

    fn params_or_default(&self, params: Option<PlotParams>) -> PlotParams {
        params.unwrap_or_else(|| PlotParams::from_config(&self.config))
    }
}
