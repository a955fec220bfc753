//! Snapshot geometry and registry metadata.

use crate::error::{DatasetError, DatasetResult};
use av_core::{FieldId, Triple, ensure_finite};
use serde::{Deserialize, Serialize};

/// One entry of the particle type registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleInfo {
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

/// Everything a snapshot reports about itself without reading cell data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub domain_dimensions: [u64; 3],
    pub domain_left_edge: Triple,
    pub domain_right_edge: Triple,
    #[serde(default)]
    pub current_time: f64,
    #[serde(default)]
    pub max_level: u32,
    /// Centimetres per code length.
    #[serde(default = "default_length_unit_cm")]
    pub length_unit_cm: f64,
    /// Native fields, in the order the source lists them.
    #[serde(default)]
    pub fields: Vec<FieldId>,
    #[serde(default)]
    pub particles: Vec<ParticleInfo>,
}

fn default_length_unit_cm() -> f64 {
    1.0
}

impl SnapshotMeta {
    pub fn domain_width(&self) -> Triple {
        let (l, r) = (&self.domain_left_edge, &self.domain_right_edge);
        [r[0] - l[0], r[1] - l[1], r[2] - l[2]]
    }

    pub fn domain_center(&self) -> Triple {
        let (l, r) = (&self.domain_left_edge, &self.domain_right_edge);
        [
            0.5 * (l[0] + r[0]),
            0.5 * (l[1] + r[1]),
            0.5 * (l[2] + r[2]),
        ]
    }

    pub fn validate(&self) -> DatasetResult<()> {
        for (axis, width) in self.domain_width().iter().enumerate() {
            if !width.is_finite() || *width <= 0.0 {
                return Err(DatasetError::InvalidGeometry {
                    what: format!("domain width along axis {axis} is {width}"),
                });
            }
        }
        if !(self.length_unit_cm.is_finite() && self.length_unit_cm > 0.0) {
            return Err(DatasetError::InvalidGeometry {
                what: format!("length unit {} cm", self.length_unit_cm),
            });
        }
        ensure_finite(self.current_time, "current_time")?;
        Ok(())
    }
}
