/*!
Character controller and orbit camera settings.

These structs gather the tunables consumed by the controller and the camera so
that a single instance describes one character's feel. `Default` builds them from
the documented constants in [`crate::constants`].

Notes
- Distances are in meters, time in seconds, angles in radians.
- If you want per-character customization, start from `Default` and override fields.
*/

use crate::constants::{
    CAMERA_TARGET_HEIGHT, CONTROLLER_BODY_RADIUS, FACING_SLERP_FACTOR, FADE_DURATION_S,
    FALL_LERP_FACTOR, GRAVITY_MPS2, GROUND_RAY_LENGTH, GROUND_PUSH_LERP_FACTOR,
    ORBIT_MAX_DISTANCE, ORBIT_MAX_POLAR, ORBIT_MIN_DISTANCE, ORBIT_MIN_POLAR, RESPAWN_POINT,
    RESPAWN_THRESHOLD_Y, RUN_VELOCITY_MPS, WALK_VELOCITY_MPS,
};
use nalgebra::Vector3;

/// Locomotion parameters for one [`crate::controller::CharacterController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerSettings {
    /// Planar speed while walking (m/s).
    pub walk_velocity: f32,
    /// Planar speed while running (m/s).
    pub run_velocity: f32,
    /// Cross-fade duration between clips (s).
    pub fade_duration: f32,
    /// Ball collider radius; the body center rests this far above the surface below it.
    pub body_radius: f32,
    /// Gravity magnitude (m/s^2, positive).
    pub gravity: f32,
    /// Maximum ground ray length (m).
    pub ground_ray_length: f32,
    /// Cast the ground ray as solid.
    ///
    /// A solid ray reports a hit at distance zero when its origin is inside a collider,
    /// so a body whose center dipped under the surface is still pushed back up. The
    /// first version of this demo cast a hollow ray (`false`); from inside a cuboid or a
    /// ball that ray only reports the far side of the shape, so the body sinks through.
    /// Heightfields behave the same either way.
    pub ground_ray_solid: bool,
    /// Teleport threshold on the body's Y coordinate.
    pub respawn_threshold_y: f32,
    /// Teleport destination.
    pub respawn_point: Vector3<f32>,
    /// Height of the orbit target above the body center.
    pub camera_target_height: f32,
    /// Per-tick slerp factor toward the heading.
    pub facing_slerp: f32,
    /// Per-tick lerp factor of the fall accumulator.
    pub fall_lerp: f32,
    /// Damping of the upward ground correction.
    pub ground_push_lerp: f32,
    /// Whether directional input starts out running.
    pub start_running: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            walk_velocity: WALK_VELOCITY_MPS,
            run_velocity: RUN_VELOCITY_MPS,
            fade_duration: FADE_DURATION_S,
            body_radius: CONTROLLER_BODY_RADIUS,
            gravity: GRAVITY_MPS2,
            ground_ray_length: GROUND_RAY_LENGTH,
            ground_ray_solid: true,
            respawn_threshold_y: RESPAWN_THRESHOLD_Y,
            respawn_point: Vector3::from(RESPAWN_POINT),
            camera_target_height: CAMERA_TARGET_HEIGHT,
            facing_slerp: FACING_SLERP_FACTOR,
            fall_lerp: FALL_LERP_FACTOR,
            ground_push_lerp: GROUND_PUSH_LERP_FACTOR,
            start_running: true,
        }
    }
}

/// Constraints applied by [`crate::camera::OrbitCamera`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle is measured from +Y.
    pub min_polar: f32,
    pub max_polar: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            min_polar: ORBIT_MIN_POLAR,
            max_polar: ORBIT_MAX_POLAR,
        }
    }
}
