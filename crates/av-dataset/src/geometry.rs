//! Principal axes and the in-plane geometry seen when looking down one.

use crate::error::DatasetError;
use crate::meta::SnapshotMeta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn id(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Image-plane axes `(horizontal, vertical)` when viewing down `self`.
    ///
    /// Cyclic so that horizontal x vertical points along the view axis.
    pub fn image_axes(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (2, 0),
            Axis::Z => (0, 1),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Axis {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "0" => Ok(Axis::X),
            "y" | "1" => Ok(Axis::Y),
            "z" | "2" => Ok(Axis::Z),
            other => Err(DatasetError::InvalidGeometry {
                what: format!("unknown axis '{other}'"),
            }),
        }
    }
}

/// In-plane geometry for one viewing axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisInfo {
    pub axis_id: usize,
    pub x_axis_id: usize,
    pub y_axis_id: usize,
    pub x_width: f64,
    pub y_width: f64,
}

impl AxisInfo {
    pub fn new(meta: &SnapshotMeta, axis: Axis) -> Self {
        let (x_axis_id, y_axis_id) = axis.image_axes();
        let width = meta.domain_width();
        Self {
            axis_id: axis.id(),
            x_axis_id,
            y_axis_id,
            x_width: width[x_axis_id],
            y_width: width[y_axis_id],
        }
    }

    /// Image height over width.
    pub fn aspect(&self) -> f64 {
        self.y_width / self.x_width
    }
}

/// Domain centre along `axis`; the default slice coordinate.
pub fn center_coordinate(meta: &SnapshotMeta, axis: Axis) -> f64 {
    meta.domain_center()[axis.id()]
}
