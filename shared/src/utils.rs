use nalgebra::{UnitQuaternion, Vector3};

use crate::constants::DIST_EPS;

/// Linear interpolation: `x * (1 - a) + y * a`.
#[inline]
pub fn lerp(x: f32, y: f32, a: f32) -> f32 {
    x * (1.0 - a) + y * a
}

/// Yaw-only rotation about +Y.
#[inline]
pub fn yaw_rotation(yaw: f32) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw)
}

/// Unit planar (XZ) direction faced by something looking back along `yaw`.
///
/// `yaw` uses the `atan2(dx, dz)` convention, so `yaw = 0` faces -Z.
#[inline]
pub fn planar_forward_from_yaw(yaw: f32) -> Vector3<f32> {
    let (sin, cos) = yaw.sin_cos();
    Vector3::new(-sin, 0.0, -cos)
}

/// Drop the vertical component and renormalize. `None` if nothing planar remains.
#[inline]
pub fn to_planar_unit(v: Vector3<f32>) -> Option<Vector3<f32>> {
    Vector3::new(v.x, 0.0, v.z).try_normalize(DIST_EPS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn forward_from_yaw_matches_rotated_minus_z() {
        for yaw in [0.0, 0.3, FRAC_PI_2, -2.0] {
            let rotated = yaw_rotation(yaw) * Vector3::new(0.0, 0.0, -1.0);
            assert!((planar_forward_from_yaw(yaw) - rotated).norm() < 1.0e-6);
        }
    }

    #[test]
    fn vertical_vector_has_no_planar_direction() {
        assert!(to_planar_unit(Vector3::new(0.0, -1.0, 0.0)).is_none());
        let v = to_planar_unit(Vector3::new(3.0, 7.0, 4.0)).expect("planar part");
        assert!((v - Vector3::new(0.6, 0.0, 0.8)).norm() < 1.0e-6);
    }
}
