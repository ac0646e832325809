use bevy::prelude::*;
use kcc_shared::DemoSceneConfig;
use leafwing_input_manager::prelude::ActionState;

use crate::{
    AppSystems,
    character::Character,
    input::InputAction,
    world::to_vec3,
};

/// Radians of orbit per pixel of mouse motion.
const ORBIT_SENSITIVITY: f32 = 0.005;
/// Meters of zoom per scroll line.
const ZOOM_STEP: f32 = 0.8;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(
        Update,
        (
            orbit.in_set(AppSystems::Orbit),
            follow_character.in_set(AppSystems::Sync),
        )
            .run_if(resource_exists::<Character>),
    );
}

fn add_camera(mut commands: Commands) {
    let config = DemoSceneConfig::default();
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: 45.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(to_vec3(&config.camera_position))
            .looking_at(to_vec3(&config.character_spawn), Vec3::Y),
    ));
}

/// Right-drag orbits around the character, scroll zooms.
fn orbit(actions: Res<ActionState<InputAction>>, mut character: ResMut<Character>) {
    let zoom = actions.value(&InputAction::Zoom);
    let look = if actions.pressed(&InputAction::OrbitDrag) {
        actions.axis_pair(&InputAction::Look)
    } else {
        Vec2::ZERO
    };
    if look == Vec2::ZERO && zoom == 0.0 {
        return;
    }

    let camera = character.controller.camera_mut();
    camera.orbit(-look.x * ORBIT_SENSITIVITY, -look.y * ORBIT_SENSITIVITY);
    camera.zoom(-zoom * ZOOM_STEP);
}

fn follow_character(
    character: Res<Character>,
    mut camera: Single<&mut Transform, With<Camera3d>>,
) {
    let orbit = character.controller.camera();
    **camera = Transform::from_translation(to_vec3(&orbit.position))
        .looking_at(to_vec3(&orbit.target), Vec3::Y);
}
