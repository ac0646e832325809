use bevy::prelude::*;
use bevy::window::WindowFocused;
use kcc_shared::{InputState, Key};
use leafwing_input_manager::prelude::*;

use crate::{AppSystems, character::Character};

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    Forward,
    Back,
    Left,
    Right,
    /// Held as a key and also flips walk/run on press.
    Shift,
    /// Right mouse button; camera orbits only while held.
    OrbitDrag,
    #[actionlike(DualAxis)]
    Look,
    #[actionlike(Axis)]
    Zoom,
}

impl InputAction {
    const KEYS: [(InputAction, Key); 5] = [
        (InputAction::Forward, Key::Forward),
        (InputAction::Back, Key::Back),
        (InputAction::Left, Key::Left),
        (InputAction::Right, Key::Right),
        (InputAction::Shift, Key::Shift),
    ];
}

/// Held keys as the simulation sees them, rebuilt every frame.
#[derive(Resource, Default, Debug)]
pub struct HeldKeys(pub InputState);

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let input_map = InputMap::new([
        (InputAction::Forward, KeyCode::KeyW),
        (InputAction::Back, KeyCode::KeyS),
        (InputAction::Left, KeyCode::KeyA),
        (InputAction::Right, KeyCode::KeyD),
        (InputAction::Shift, KeyCode::ShiftLeft),
        (InputAction::Shift, KeyCode::ShiftRight),
    ])
    .with(InputAction::OrbitDrag, MouseButton::Right)
    .with_dual_axis(InputAction::Look, MouseMove::default())
    .with_axis(InputAction::Zoom, MouseScrollAxis::Y);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());
    app.init_resource::<HeldKeys>();

    app.add_systems(
        Update,
        (record_held_keys, release_on_focus_lost, toggle_run)
            .chain()
            .in_set(AppSystems::RecordInput),
    );
}

fn record_held_keys(actions: Res<ActionState<InputAction>>, mut held: ResMut<HeldKeys>) {
    for (action, key) in InputAction::KEYS {
        held.0.set(key, actions.pressed(&action));
    }
}

/// A window that lost focus never sees the key-up events, so drop every held key.
fn release_on_focus_lost(mut focus: MessageReader<WindowFocused>, mut held: ResMut<HeldKeys>) {
    if focus.read().any(|event| !event.focused) {
        held.0.clear();
    }
}

fn toggle_run(actions: Res<ActionState<InputAction>>, character: Option<ResMut<Character>>) {
    if !actions.just_pressed(&InputAction::Shift) {
        return;
    }
    if let Some(mut character) = character {
        character.controller.switch_run_toggle();
    }
}
