//! av-params: plot parameters and global plot configuration.

pub mod config;
pub mod params;

pub use config::{PlotConfig, load_config};
pub use params::*;

use std::path::Path;

pub type ParamsResult<T> = Result<T, ParamsError>;

#[derive(thiserror::Error, Debug)]
pub enum ParamsError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_params_yaml(path: &Path) -> ParamsResult<PlotParams> {
    let content = std::fs::read_to_string(path)?;
    let params: PlotParams = serde_yaml::from_str(&content)?;
    params.validate()?;
    Ok(params)
}

pub fn load_params_json(path: &Path) -> ParamsResult<PlotParams> {
    let content = std::fs::read_to_string(path)?;
    let params: PlotParams = serde_json::from_str(&content)?;
    params.validate()?;
    Ok(params)
}
