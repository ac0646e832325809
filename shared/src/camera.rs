use nalgebra::Vector3;

use crate::{constants::DIST_EPS, settings::OrbitLimits};

/// A look-at camera that orbits a target point.
///
/// The character controller overwrites `position` and `target` every tick; user input
/// rotates and zooms around the target between ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub limits: OrbitLimits,
}

impl OrbitCamera {
    pub fn new(position: Vector3<f32>, target: Vector3<f32>) -> Self {
        Self {
            position,
            target,
            limits: OrbitLimits::default(),
        }
    }

    /// Unit view direction, from the camera toward its target.
    ///
    /// Falls back to -Z when position and target coincide.
    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.position)
            .try_normalize(DIST_EPS)
            .unwrap_or_else(|| Vector3::new(0.0, 0.0, -1.0))
    }

    /// Heading of the camera as seen from `origin`, around +Y.
    ///
    /// `atan2(camera.x - origin.x, camera.z - origin.z)`; zero means the camera sits on
    /// the +Z side of `origin`.
    pub fn view_yaw(&self, origin: &Vector3<f32>) -> f32 {
        (self.position.x - origin.x).atan2(self.position.z - origin.z)
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// Rotate around the target by `d_yaw` (around +Y) and `d_polar` (toward/away from +Y).
    pub fn orbit(&mut self, d_yaw: f32, d_polar: f32) {
        let (radius, polar, azimuth) = self.spherical();
        self.set_spherical(radius, polar + d_polar, azimuth + d_yaw);
    }

    /// Move toward (`delta < 0`) or away from the target.
    pub fn zoom(&mut self, delta: f32) {
        let (radius, polar, azimuth) = self.spherical();
        self.set_spherical(radius + delta, polar, azimuth);
    }

    /// Offset from target as (radius, polar from +Y, azimuth around +Y from +Z).
    fn spherical(&self) -> (f32, f32, f32) {
        let offset = self.position - self.target;
        let radius = offset.norm();
        if radius <= DIST_EPS {
            return (0.0, 0.0, 0.0);
        }
        let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let azimuth = offset.x.atan2(offset.z);
        (radius, polar, azimuth)
    }

    fn set_spherical(&mut self, radius: f32, polar: f32, azimuth: f32) {
        let limits = self.limits;
        let radius = radius.clamp(limits.min_distance, limits.max_distance);
        let polar = polar.clamp(limits.min_polar, limits.max_polar);
        let (sin_p, cos_p) = polar.sin_cos();
        let (sin_a, cos_a) = azimuth.sin_cos();
        self.position = self.target + Vector3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * radius;
    }
}
