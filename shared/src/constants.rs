use std::f32::consts::PI;
use std::time::Duration;

/// Planar speed while the Walk action is current (meters per second).
pub const WALK_VELOCITY_MPS: f32 = 2.0;

/// Planar speed while the Run action is current (meters per second).
pub const RUN_VELOCITY_MPS: f32 = 5.0;

/// Cross-fade duration between locomotion clips (seconds).
pub const FADE_DURATION_S: f32 = 0.2;

/// Radius of the character's ball collider (meters).
///
/// The ground ray correction keeps the body center this far above the surface it hits.
pub const CONTROLLER_BODY_RADIUS: f32 = 0.28;

/// Gravity magnitude in meters per second squared (positive value).
pub const GRAVITY_MPS2: f32 = 9.81;

/// Maximum length of the downward ground ray (meters).
pub const GROUND_RAY_LENGTH: f32 = 0.5;

/// Below this height the character is teleported back to [`RESPAWN_POINT`].
pub const RESPAWN_THRESHOLD_Y: f32 = -1.0;

/// Where a character that fell out of the world reappears.
pub const RESPAWN_POINT: [f32; 3] = [0.0, 10.0, 0.0];

/// Vertical bias added to the orbit target so the camera looks above the feet (meters).
pub const CAMERA_TARGET_HEIGHT: f32 = 1.0;

/// Camera offset from the character used before the first tick.
pub const INITIAL_CAMERA_OFFSET: [f32; 3] = [0.0, 1.0, 5.0];

/// Per-tick interpolation factor used to turn the model toward its heading.
pub const FACING_SLERP_FACTOR: f32 = 0.2;

/// Per-tick interpolation factor for the fall accumulator.
///
/// `fall = lerp(fall, -GRAVITY_MPS2 * dt, FALL_LERP_FACTOR)`
pub const FALL_LERP_FACTOR: f32 = 0.10;

/// Damping applied to the upward correction when the body sinks below the ground line.
pub const GROUND_PUSH_LERP_FACTOR: f32 = 0.5;

/// Default simulation tick interval. Matches the ~16ms timer cadence of the demo loop.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Upper bound on catch-up ticks run for a single rendered frame.
///
/// Prevents a long stall (window drag, debugger) from spiralling into hundreds of ticks.
pub const MAX_CATCH_UP_STEPS: u32 = 5;

/// Closest the orbit camera may get to its target (meters).
pub const ORBIT_MIN_DISTANCE: f32 = 5.0;

/// Farthest the orbit camera may get from its target (meters).
pub const ORBIT_MAX_DISTANCE: f32 = 20.0;

/// Smallest polar angle from +Y (radians). Prevents a top-down view.
pub const ORBIT_MIN_POLAR: f32 = PI / 4.0;

/// Largest polar angle from +Y (radians). Keeps the camera above the ground.
pub const ORBIT_MAX_POLAR: f32 = PI / 2.0 - 0.05;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;
