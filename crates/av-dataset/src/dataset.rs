//! The loaded dataset handle.

use crate::derived::{DerivedFieldProvider, FieldCatalog, FieldOrigin, ThermoSettings};
use crate::error::{DatasetError, DatasetResult};
use crate::geometry::{self, Axis, AxisInfo};
use crate::memory::MemorySnapshot;
use crate::meta::SnapshotMeta;
use crate::source::{self, SnapshotSource};
use av_core::{FieldId, Triple};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Options applied once when a dataset is opened.
#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
    pub add_derived_fields: bool,
    pub thermo: ThermoSettings,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            add_derived_fields: true,
            thermo: ThermoSettings::default(),
        }
    }
}

/// Read-only view of one snapshot.
///
/// Geometry and the field catalog are fixed at construction; loading another
/// snapshot means building a new `Dataset`.
pub struct Dataset {
    source: Box<dyn SnapshotSource>,
    meta: SnapshotMeta,
    catalog: FieldCatalog,
    thermo: ThermoSettings,
}

impl Dataset {
    pub fn new(source: impl SnapshotSource + 'static, options: OpenOptions) -> DatasetResult<Self> {
        let meta = source.describe()?;
        let native = FieldCatalog::from_native(meta.fields.iter().cloned());
        let catalog = if options.add_derived_fields {
            DerivedFieldProvider::new(options.thermo).apply(&native)
        } else {
            native
        };

        info!(
            dataset = source.label(),
            native = meta.fields.len(),
            available = catalog.len(),
            "dataset opened"
        );

        Ok(Self {
            source: Box::new(source),
            meta,
            catalog,
            thermo: options.thermo,
        })
    }

    /// Open a YAML snapshot description with default options.
    pub fn open(path: &Path) -> DatasetResult<Self> {
        Self::open_with(path, OpenOptions::default())
    }

    pub fn open_with(path: &Path, options: OpenOptions) -> DatasetResult<Self> {
        let snapshot = MemorySnapshot::load(path)?;
        Self::new(snapshot, options)
    }

    pub fn label(&self) -> &str {
        self.source.label()
    }

    pub fn meta(&self) -> &SnapshotMeta {
        &self.meta
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn thermo(&self) -> &ThermoSettings {
        &self.thermo
    }

    pub fn domain_dimensions(&self) -> [u64; 3] {
        self.meta.domain_dimensions
    }

    pub fn domain_width(&self) -> Triple {
        self.meta.domain_width()
    }

    pub fn domain_center(&self) -> Triple {
        self.meta.domain_center()
    }

    pub fn domain_left_edge(&self) -> Triple {
        self.meta.domain_left_edge
    }

    pub fn domain_right_edge(&self) -> Triple {
        self.meta.domain_right_edge
    }

    pub fn current_time(&self) -> f64 {
        self.meta.current_time
    }

    pub fn max_level(&self) -> u32 {
        self.meta.max_level
    }

    /// Native and derived fields, native first.
    pub fn fields(&self) -> Vec<FieldId> {
        self.catalog.fields()
    }

    pub fn has_field(&self, field: &FieldId) -> bool {
        self.catalog.contains(field)
    }

    pub fn particle_types(&self) -> Vec<&str> {
        self.meta.particles.iter().map(|p| p.name.as_str()).collect()
    }

    /// Registry count for a particle type, `None` if the type is unknown.
    pub fn particle_count(&self, ptype: &str) -> Option<u64> {
        self.meta
            .particles
            .iter()
            .find(|p| p.name == ptype)
            .map(|p| p.count)
    }

    pub fn particle_positions(&self, ptype: &str) -> DatasetResult<Vec<Triple>> {
        self.source.particle_positions(ptype)
    }

    pub fn field_values(&self, field: &FieldId) -> DatasetResult<Vec<f64>> {
        let entry = self
            .catalog
            .get(field)
            .ok_or_else(|| DatasetError::FieldNotFound {
                field: field.clone(),
            })?;
        match entry.origin {
            FieldOrigin::Native => self.source.field_values(field),
            FieldOrigin::Derived(derived) => {
                derived.evaluate(&self.thermo, |input| self.field_values(input))
            }
        }
    }

    pub fn field_extrema(&self, field: &FieldId) -> DatasetResult<(f64, f64)> {
        let entry = self
            .catalog
            .get(field)
            .ok_or_else(|| DatasetError::FieldNotFound {
                field: field.clone(),
            })?;
        match entry.origin {
            FieldOrigin::Native => self.source.field_extrema(field),
            FieldOrigin::Derived(_) => source::extrema(field, &self.field_values(field)?),
        }
    }

    pub fn axis_info(&self, axis: Axis) -> AxisInfo {
        AxisInfo::new(&self.meta, axis)
    }

    pub fn center_coordinate(&self, axis: Axis) -> f64 {
        geometry::center_coordinate(&self.meta, axis)
    }

    pub fn summary(&self) -> String {
        let d = self.meta.domain_dimensions;
        format!(
            "Dataset: {}\n  Domain: [{}, {}, {}]\n  Time: {:e}\n  Max level: {}\n  Fields: {} available",
            self.label(),
            d[0],
            d[1],
            d[2],
            self.meta.current_time,
            self.meta.max_level,
            self.catalog.len()
        )
    }
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("label", &self.label())
            .field("fields", &self.catalog.len())
            .finish()
    }
}
