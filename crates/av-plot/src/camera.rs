//! Volume-rendering camera derived from spherical viewing angles.

use av_core::{Triple, argmax, min_component};
use nalgebra::{Unit, Vector3};
use serde::Serialize;

/// A view component above this magnitude counts as looking down that axis.
pub const AXIS_ALIGNED: f64 = 0.9;

/// Perspective cameras sit this many widths back from the focus.
pub const PERSPECTIVE_DISTANCE: f64 = 1.5;

/// Square preview resolution in pixels.
pub const PREVIEW_RESOLUTION: u32 = 512;

/// Full-quality renders oversample the figure by this factor.
pub const OVERSAMPLE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lens {
    Perspective,
    PlaneParallel,
}

/// Resolved camera for one volume render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraGeometry {
    /// Unit vector from the origin towards the camera in spherical terms.
    pub direction: Vector3<f64>,
    pub north: Vector3<f64>,
    /// Visible width in code length.
    pub width: f64,
    pub focus: Triple,
    /// Only set for perspective cameras.
    pub position: Option<Vector3<f64>>,
    pub resolution: [u32; 2],
    pub lens: Lens,
}

impl CameraGeometry {
    /// Build the camera looking at `focus`.
    ///
    /// `explicit_width` is already in code length; without one the width
    /// follows the domain shape.
    pub fn resolve(
        theta_deg: f64,
        phi_deg: f64,
        domain_width: &Triple,
        focus: Triple,
        explicit_width: Option<f64>,
        lens: Lens,
        resolution: u32,
    ) -> Self {
        let direction = view_direction(theta_deg, phi_deg);
        let north = north_vector(&direction);
        let width = explicit_width.unwrap_or_else(|| camera_width(&direction, domain_width));
        let position = match lens {
            Lens::Perspective => Some(perspective_position(&focus, &direction, width)),
            Lens::PlaneParallel => None,
        };

        Self {
            direction: direction.into_inner(),
            north: north.into_inner(),
            width,
            focus,
            position,
            resolution: [resolution, resolution],
            lens,
        }
    }
}

/// Spherical angles in degrees to a unit direction.
///
/// Falls back to +x if the vector has no length.
pub fn view_direction(theta_deg: f64, phi_deg: f64) -> Unit<Vector3<f64>> {
    let (theta, phi) = (theta_deg.to_radians(), phi_deg.to_radians());
    let v = Vector3::new(
        theta.sin() * phi.cos(),
        theta.sin() * phi.sin(),
        theta.cos(),
    );
    Unit::try_new(v, 0.0).unwrap_or_else(Vector3::x_axis)
}

/// Up vector: +z unless the view is nearly along z, then +y.
pub fn north_vector(direction: &Vector3<f64>) -> Unit<Vector3<f64>> {
    if direction.z.abs() > AXIS_ALIGNED {
        Vector3::y_axis()
    } else {
        Vector3::z_axis()
    }
}

/// Width that frames the domain.
///
/// Normally the longest domain side; looking straight down that side would
/// foreshorten it, so the shortest side is used instead.
pub fn camera_width(direction: &Vector3<f64>, domain_width: &Triple) -> f64 {
    let longest = argmax(domain_width);
    if direction[longest].abs() > AXIS_ALIGNED {
        min_component(domain_width)
    } else {
        domain_width[longest]
    }
}

pub fn perspective_position(focus: &Triple, direction: &Vector3<f64>, width: f64) -> Vector3<f64> {
    Vector3::from(*focus) - direction * (PERSPECTIVE_DISTANCE * width)
}

/// Square image resolution in pixels.
pub fn resolution(preview: bool, short_size: f64, dpi: u32) -> u32 {
    if preview {
        PREVIEW_RESOLUTION
    } else {
        (short_size * f64::from(dpi) * OVERSAMPLE) as u32
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn direction_and_north_are_unit(theta in 0.0_f64..180.0, phi in 0.0_f64..360.0) {
            let dir = view_direction(theta, phi);
            prop_assert!((dir.norm() - 1.0).abs() < 1e-9);
            prop_assert!((north_vector(&dir).norm() - 1.0).abs() < 1e-12);
        }

        #[test]
        fn width_is_a_domain_side(
            theta in 0.0_f64..180.0,
            phi in 0.0_f64..360.0,
            w in prop::array::uniform3(0.1_f64..10.0),
        ) {
            let width = camera_width(&view_direction(theta, phi), &w);
            prop_assert!(w.contains(&width));
        }
    }
}
