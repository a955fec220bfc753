//! Dataset errors.

use av_core::{CoreError, FieldId};
use std::path::PathBuf;
use thiserror::Error;

pub type DatasetResult<T> = Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to load dataset {path}: {message}")]
    LoadFailure { path: PathBuf, message: String },

    #[error("Field not available: {field}")]
    FieldNotFound { field: FieldId },

    #[error("Particle data unavailable for {ptype}")]
    ParticlesUnavailable { ptype: String },

    #[error("Cannot evaluate {field}: {message}")]
    Evaluation { field: FieldId, message: String },

    #[error("Invalid geometry: {what}")]
    InvalidGeometry { what: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}
