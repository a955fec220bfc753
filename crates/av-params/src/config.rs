//! Global plot configuration.

use crate::ParamsResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by every plot unless a [`crate::PlotParams`] overrides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Short side of the figure in inches.
    pub short_size: f64,
    pub font_size: u32,
    /// Scale bar height as a fraction of the plot.
    pub scale_bar_height_fraction: f64,
    /// Colorbar width as a fraction of the plot width.
    pub colormap_fraction: f64,
    pub default_dpi: u32,
    pub show_axes: bool,
    /// When set, wins over the per-plot perspective flag.
    pub use_perspective_camera: Option<bool>,
    /// Particle families known to the simulation code, without suffix.
    pub particle_types: Vec<String>,
    pub default_particle_size: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            short_size: 3.6,
            font_size: 20,
            scale_bar_height_fraction: 15.0,
            colormap_fraction: 0.1,
            default_dpi: 300,
            show_axes: false,
            use_perspective_camera: None,
            particle_types: ["Rad", "CIC", "CICRad", "StochasticStellarPop", "Sink"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_particle_size: 10,
        }
    }
}

impl PlotConfig {
    /// Registry names, e.g. `CIC_particles`.
    pub fn particle_types_with_suffix(&self) -> Vec<String> {
        self.particle_types
            .iter()
            .map(|t| format!("{t}_particles"))
            .collect()
    }
}

/// Load configuration from YAML.
///
/// No path, a missing file and an empty file all give the defaults.
pub fn load_config(path: Option<&Path>) -> ParamsResult<PlotConfig> {
    let Some(path) = path else {
        return Ok(PlotConfig::default());
    };
    if !path.exists() {
        return Ok(PlotConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(PlotConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}
