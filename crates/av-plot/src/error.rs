//! Error types for plot resolution and rendering.

use av_core::{CoreError, UnitError};
use av_dataset::DatasetError;
use av_params::ParamsError;
use std::path::PathBuf;
use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Invalid field specification: {what}")]
    InvalidFieldSpec { what: String },

    #[error("Dataset not found: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Failed to load dataset {path}: {message}")]
    DatasetLoadFailure { path: PathBuf, message: String },

    #[error("Unknown plot kind: {kind}")]
    UnknownPlotKind { kind: String },

    #[error("Invalid range [{vmin}, {vmax}]: {reason}")]
    InvalidRange {
        vmin: f64,
        vmax: f64,
        reason: &'static str,
    },

    #[error("Invalid unit '{unit}': {source}")]
    InvalidUnit { unit: String, source: UnitError },

    #[error("Invalid parameters: {0}")]
    InvalidParams(#[from] ParamsError),

    #[error("Dataset error: {0}")]
    Dataset(DatasetError),

    #[error("Render failed: {message}")]
    Render { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DatasetError> for PlotError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::NotFound { path } => PlotError::DatasetNotFound { path },
            DatasetError::LoadFailure { path, message } => {
                PlotError::DatasetLoadFailure { path, message }
            }
            other => PlotError::Dataset(other),
        }
    }
}

impl From<CoreError> for PlotError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidFieldSpec { what } => PlotError::InvalidFieldSpec { what },
            other => PlotError::Dataset(DatasetError::Core(other)),
        }
    }
}
