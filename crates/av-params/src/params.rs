//! Parameter groups for slice, projection and volume plots.
//!
//! Every group deserialises with defaults, so a parameter file only needs to
//! name what it changes:
//! ```yaml
//! cmap: inferno
//! vmin: 1.0e-26
//! scale_bar:
//!   show: true
//!   size: 10
//!   unit: pc
//! ```

use crate::config::PlotConfig;
use crate::{ParamsError, ParamsResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorbarOrientation {
    #[default]
    Right,
    Left,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorbarParams {
    pub show: bool,
    /// Replaces the default field label when set.
    pub label: Option<String>,
    pub orientation: ColorbarOrientation,
}

impl Default for ColorbarParams {
    fn default() -> Self {
        Self {
            show: true,
            label: None,
            orientation: ColorbarOrientation::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleBarParams {
    pub show: bool,
    pub size: Option<f64>,
    pub unit: Option<String>,
    /// Axis-fraction anchor; derived from the image aspect when unset.
    pub position: Option<[f64; 2]>,
    pub color: String,
}

impl Default for ScaleBarParams {
    fn default() -> Self {
        Self {
            show: false,
            size: None,
            unit: None,
            position: None,
            color: "white".to_string(),
        }
    }
}

impl ScaleBarParams {
    /// Physical bar length, present only when a positive size and a unit are both set.
    pub fn fixed_size(&self) -> Option<(f64, &str)> {
        match (self.size, self.unit.as_deref()) {
            (Some(size), Some(unit)) if size > 0.0 && !unit.trim().is_empty() => {
                Some((size, unit.trim()))
            }
            _ => None,
        }
    }
}

/// Zoom window; only meaningful when both value and unit are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WidthParams {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

impl WidthParams {
    pub fn resolved(&self) -> Option<(f64, &str)> {
        match (self.value, self.unit.as_deref()) {
            (Some(value), Some(unit)) => Some((value, unit)),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.resolved().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleParams {
    /// Particle types to overlay, e.g. `CIC_particles`.
    pub types: Vec<String>,
    pub size: u32,
    pub color: String,
    pub marker: String,
    /// Selection depth as a fraction of the domain width.
    pub depth_fraction: f64,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            size: 10,
            color: "red".to_string(),
            marker: "o".to_string(),
            depth_fraction: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnnotationParams {
    pub show_timestamp: bool,
    pub show_grids: bool,
    pub top_left_text: Option<String>,
    pub top_right_text: Option<String>,
}

/// Upper bound on transfer-function layers.
pub const MAX_LAYERS: u32 = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeParams {
    /// Polar angle from +z in degrees.
    pub camera_theta: f64,
    /// Azimuth from +x in degrees.
    pub camera_phi: f64,
    pub n_layers: u32,
    pub alpha_min: f64,
    pub alpha_max: f64,
    pub grey_opacity: bool,
    pub show_box_frame: bool,
    pub use_perspective: bool,
    /// Render at a small fixed resolution.
    pub preview: bool,
}

impl Default for VolumeParams {
    fn default() -> Self {
        Self {
            camera_theta: 45.0,
            camera_phi: 45.0,
            n_layers: 5,
            alpha_min: 0.1,
            alpha_max: 1.0,
            grey_opacity: false,
            show_box_frame: false,
            use_perspective: true,
            preview: false,
        }
    }
}

/// All parameters of a single render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotParams {
    pub cmap: String,
    pub log_scale: bool,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    /// Display unit for the plotted field.
    pub field_unit: Option<String>,

    pub dpi: u32,
    /// Short side of the figure in inches.
    pub short_size: f64,
    pub font_size: u32,
    pub show_axes: bool,
    pub background_color: String,

    pub colorbar: ColorbarParams,
    pub scale_bar: ScaleBarParams,
    pub width: WidthParams,
    pub particles: ParticleParams,
    pub annotations: AnnotationParams,
    pub volume: VolumeParams,
}

impl Default for PlotParams {
    fn default() -> Self {
        Self {
            cmap: "viridis".to_string(),
            log_scale: true,
            vmin: None,
            vmax: None,
            field_unit: None,
            dpi: 300,
            short_size: 3.6,
            font_size: 20,
            show_axes: false,
            background_color: "black".to_string(),
            colorbar: ColorbarParams::default(),
            scale_bar: ScaleBarParams::default(),
            width: WidthParams::default(),
            particles: ParticleParams::default(),
            annotations: AnnotationParams::default(),
            volume: VolumeParams::default(),
        }
    }
}

impl PlotParams {
    /// Defaults seeded from the global configuration.
    pub fn from_config(config: &PlotConfig) -> Self {
        let mut params = Self {
            dpi: config.default_dpi,
            short_size: config.short_size,
            font_size: config.font_size,
            show_axes: config.show_axes,
            ..Self::default()
        };
        params.particles.size = config.default_particle_size;
        params
    }

    pub fn with_colorbar(
        &self,
        show: bool,
        label: Option<&str>,
        orientation: ColorbarOrientation,
    ) -> Self {
        Self {
            colorbar: ColorbarParams {
                show,
                label: label.map(str::to_string),
                orientation,
            },
            ..self.clone()
        }
    }

    pub fn with_scale_bar(&self, show: bool, size: Option<f64>, unit: Option<&str>) -> Self {
        Self {
            scale_bar: ScaleBarParams {
                show,
                size,
                unit: unit.map(str::to_string),
                ..ScaleBarParams::default()
            },
            ..self.clone()
        }
    }

    pub fn with_width(&self, value: f64, unit: &str) -> Self {
        Self {
            width: WidthParams {
                value: Some(value),
                unit: Some(unit.to_string()),
            },
            ..self.clone()
        }
    }

    pub fn validate(&self) -> ParamsResult<()> {
        let invalid = |field, value: String, reason| {
            Err(ParamsError::InvalidValue {
                field,
                value,
                reason,
            })
        };

        if self.dpi == 0 {
            return invalid("dpi", self.dpi.to_string(), "must be positive");
        }
        if !(self.short_size.is_finite() && self.short_size > 0.0) {
            return invalid("short_size", self.short_size.to_string(), "must be positive");
        }
        if let (Some(lo), Some(hi)) = (self.vmin, self.vmax) {
            if lo > hi {
                return invalid("vmin", lo.to_string(), "must not exceed vmax");
            }
        }
        if let Some(value) = self.width.value {
            if !(value.is_finite() && value > 0.0) {
                return invalid("width.value", value.to_string(), "must be positive");
            }
        }
        let depth = self.particles.depth_fraction;
        if !(depth > 0.0 && depth <= 1.0) {
            return invalid("particles.depth_fraction", depth.to_string(), "must be in (0, 1]");
        }
        let vol = &self.volume;
        if vol.n_layers == 0 || vol.n_layers > MAX_LAYERS {
            return invalid("volume.n_layers", vol.n_layers.to_string(), "must be in 1..=256");
        }
        if !(0.0..=1.0).contains(&vol.alpha_min)
            || !(0.0..=1.0).contains(&vol.alpha_max)
            || vol.alpha_min > vol.alpha_max
        {
            return invalid(
                "volume.alpha_min",
                format!("{}..{}", vol.alpha_min, vol.alpha_max),
                "alpha bounds must be ordered within [0, 1]",
            );
        }
        if !(vol.camera_theta.is_finite() && vol.camera_phi.is_finite()) {
            return invalid(
                "volume.camera_theta",
                format!("{}, {}", vol.camera_theta, vol.camera_phi),
                "camera angles must be finite",
            );
        }
        Ok(())
    }
}
