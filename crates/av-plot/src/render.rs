//! The seam to the drawing backend.

use crate::resolve::ResolvedPlot;
use crate::volume::VolumeScene;
use av_dataset::Dataset;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The backend could not typeset a colorbar or axis label.
    #[error("Cannot typeset label '{label}'")]
    UnitLabel { label: String },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

/// Draws resolved plans to encoded image bytes (PNG).
///
/// Implementations must be thread-safe (Send + Sync); one renderer may serve
/// concurrent requests against the same dataset.
pub trait Renderer: Send + Sync {
    fn render_plot(&self, dataset: &Dataset, plot: &ResolvedPlot) -> Result<Vec<u8>, RenderError>;

    fn render_volume(&self, dataset: &Dataset, scene: &VolumeScene)
    -> Result<Vec<u8>, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Arc<R> {
    fn render_plot(&self, dataset: &Dataset, plot: &ResolvedPlot) -> Result<Vec<u8>, RenderError> {
        (**self).render_plot(dataset, plot)
    }

    fn render_volume(&self, dataset: &Dataset, scene: &VolumeScene)
    -> Result<Vec<u8>, RenderError> {
        (**self).render_volume(dataset, scene)
    }
}
