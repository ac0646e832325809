use crate::animation::Action;

/// Setup-time contract violations.
///
/// These are raised while the scene or the character is being assembled. None of them
/// can happen inside a tick once setup succeeded.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("animation clip for action `{0}` is missing")]
    MissingClip(Action),

    #[error("rigid body {0:?} does not exist in the physics world")]
    UnknownBody(rapier3d::prelude::RigidBodyHandle),

    #[error("terrain needs at least one subdivision, got {0}")]
    InvalidTerrain(usize),
}
