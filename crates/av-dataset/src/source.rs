//! The boundary to whatever actually reads snapshot files.

use crate::error::{DatasetError, DatasetResult};
use crate::meta::SnapshotMeta;
use av_core::{FieldId, Triple};

/// Reader for one AMR snapshot.
///
/// Implementations must be thread-safe (Send + Sync); a dataset is shared
/// read-only between concurrent renders.
pub trait SnapshotSource: Send + Sync {
    /// Short name for logging (usually the snapshot path).
    fn label(&self) -> &str;

    /// Geometry, native field list and particle registry.
    fn describe(&self) -> DatasetResult<SnapshotMeta>;

    /// Flattened cell values of a native field.
    fn field_values(&self, field: &FieldId) -> DatasetResult<Vec<f64>>;

    /// Minimum and maximum of a native field.
    fn field_extrema(&self, field: &FieldId) -> DatasetResult<(f64, f64)> {
        let values = self.field_values(field)?;
        extrema(field, &values)
    }

    /// Particle positions for one particle type.
    fn particle_positions(&self, ptype: &str) -> DatasetResult<Vec<Triple>>;
}

/// Finite min/max of `values`, skipping NaN.
pub fn extrema(field: &FieldId, values: &[f64]) -> DatasetResult<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    for v in values.iter().copied().filter(|v| !v.is_nan()) {
        range = Some(match range {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }
    range.ok_or_else(|| DatasetError::Evaluation {
        field: field.clone(),
        message: "no values to take extrema of".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrema_skips_nan() {
        let f = FieldId::gas("density");
        assert_eq!(extrema(&f, &[3.0, f64::NAN, -1.0, 2.0]).unwrap(), (-1.0, 3.0));
        assert!(extrema(&f, &[]).is_err());
    }
}
