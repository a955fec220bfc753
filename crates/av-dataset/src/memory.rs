//! Snapshot held entirely in memory, described by YAML.
//!
//! ```yaml
//! domain_dimensions: [16, 16, 32]
//! domain_left_edge: [0.0, 0.0, 0.0]
//! domain_right_edge: [1.0, 1.0, 2.0]
//! current_time: 3.1e13
//! fields:
//!   - [gas, density]
//! particles:
//!   - name: Sink_particles
//!     count: 1
//! cells:
//!   - field: [gas, density]
//!     values: [1.0e-24, 2.0e-24]
//! particle_positions:
//!   - name: Sink_particles
//!     positions: [[0.5, 0.5, 1.0]]
//! ```

use crate::error::{DatasetError, DatasetResult};
use crate::meta::SnapshotMeta;
use crate::source::SnapshotSource;
use av_core::{FieldId, Triple};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellField {
    pub field: FieldId,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticlePositions {
    pub name: String,
    pub positions: Vec<Triple>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    #[serde(skip)]
    label: String,
    #[serde(flatten)]
    pub meta: SnapshotMeta,
    #[serde(default)]
    pub cells: Vec<CellField>,
    #[serde(default)]
    pub particle_positions: Vec<ParticlePositions>,
}

impl MemorySnapshot {
    pub fn new(label: impl Into<String>, meta: SnapshotMeta) -> Self {
        Self {
            label: label.into(),
            meta,
            cells: Vec::new(),
            particle_positions: Vec::new(),
        }
    }

    /// Attach cell values; the field is added to the native list if missing.
    pub fn with_cells(mut self, field: FieldId, values: Vec<f64>) -> Self {
        if !self.meta.fields.contains(&field) {
            self.meta.fields.push(field.clone());
        }
        self.cells.push(CellField { field, values });
        self
    }

    pub fn with_particles(mut self, name: &str, positions: Vec<Triple>) -> Self {
        self.particle_positions.push(ParticlePositions {
            name: name.to_string(),
            positions,
        });
        self
    }

    pub fn from_yaml_str(label: &str, content: &str) -> DatasetResult<Self> {
        let mut snapshot: Self =
            serde_yaml::from_str(content).map_err(|e| DatasetError::LoadFailure {
                path: label.into(),
                message: e.to_string(),
            })?;
        snapshot.label = label.to_string();
        Ok(snapshot)
    }

    pub fn load(path: &Path) -> DatasetResult<Self> {
        if !path.exists() {
            return Err(DatasetError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| DatasetError::LoadFailure {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&path.display().to_string(), &content)
    }
}

impl SnapshotSource for MemorySnapshot {
    fn label(&self) -> &str {
        &self.label
    }

    fn describe(&self) -> DatasetResult<SnapshotMeta> {
        self.meta.validate()?;
        Ok(self.meta.clone())
    }

    fn field_values(&self, field: &FieldId) -> DatasetResult<Vec<f64>> {
        self.cells
            .iter()
            .find(|c| &c.field == field)
            .map(|c| c.values.clone())
            .ok_or_else(|| DatasetError::FieldNotFound {
                field: field.clone(),
            })
    }

    fn particle_positions(&self, ptype: &str) -> DatasetResult<Vec<Triple>> {
        self.particle_positions
            .iter()
            .find(|p| p.name == ptype)
            .map(|p| p.positions.clone())
            .ok_or_else(|| DatasetError::ParticlesUnavailable {
                ptype: ptype.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"
domain_dimensions: [16, 16, 32]
domain_left_edge: [0.0, 0.0, 0.0]
domain_right_edge: [1.0, 1.0, 2.0]
current_time: 3.1e13
fields:
  - [gas, density]
  - [gas, density]
particles:
  - name: Sink_particles
    count: 1
cells:
  - field: [gas, density]
    values: [1.0e-24, 4.0e-24, 2.0e-24]
particle_positions:
  - name: Sink_particles
    positions: [[0.5, 0.5, 1.0]]
"#;

    #[test]
    fn parses_yaml_description() {
        let snap = MemorySnapshot::from_yaml_str("plt00010", SNAPSHOT).unwrap();
        assert_eq!(snap.label(), "plt00010");
        let meta = snap.describe().unwrap();
        assert_eq!(meta.domain_dimensions, [16, 16, 32]);
        assert_eq!(meta.length_unit_cm, 1.0);
        assert_eq!(meta.particles[0].count, 1);

        let (lo, hi) = snap.field_extrema(&FieldId::gas("density")).unwrap();
        assert_eq!((lo, hi), (1.0e-24, 4.0e-24));
        assert_eq!(snap.particle_positions("Sink_particles").unwrap().len(), 1);
    }

    #[test]
    fn missing_data_is_reported() {
        let snap = MemorySnapshot::from_yaml_str("plt", SNAPSHOT).unwrap();
        assert!(matches!(
            snap.field_values(&FieldId::gas("pressure")),
            Err(DatasetError::FieldNotFound { .. })
        ));
        assert!(matches!(
            snap.particle_positions("CIC_particles"),
            Err(DatasetError::ParticlesUnavailable { .. })
        ));
    }

    #[test]
    fn malformed_yaml_is_a_load_failure() {
        let err = MemorySnapshot::from_yaml_str("bad", "domain_dimensions: nope").unwrap_err();
        assert!(matches!(err, DatasetError::LoadFailure { .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = std::env::temp_dir().join("amrviz_missing_snapshot_plt99999.yaml");
        assert!(matches!(
            MemorySnapshot::load(&path),
            Err(DatasetError::NotFound { .. })
        ));
    }
}
