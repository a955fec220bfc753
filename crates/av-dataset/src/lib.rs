//! av-dataset: the loaded-snapshot side of amrviz.
//!
//! A [`Dataset`] wraps an external [`SnapshotSource`] together with an
//! immutable [`FieldCatalog`] that is built once at open time, including the
//! derived thermodynamic fields. Axis geometry used for figure sizing lives in
//! [`geometry`].

pub mod dataset;
pub mod derived;
pub mod error;
pub mod geometry;
pub mod memory;
pub mod meta;
pub mod source;

pub use dataset::{Dataset, OpenOptions};
pub use derived::{
    CatalogEntry, DerivedField, DerivedFieldProvider, FieldCatalog, FieldOrigin,
    TemperatureSource, ThermoSettings,
};
pub use error::{DatasetError, DatasetResult};
pub use geometry::{Axis, AxisInfo};
pub use memory::MemorySnapshot;
pub use meta::{ParticleInfo, SnapshotMeta};
pub use source::SnapshotSource;
