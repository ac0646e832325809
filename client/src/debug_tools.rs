//! Performance overlay for native dev builds. `F3` shows or hides it.

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use iyes_perf_ui::prelude::*;

const TOGGLE_KEY: KeyCode = KeyCode::F3;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(Update, toggle_perf_ui);
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiDefaultEntries::default());
}

fn toggle_perf_ui(
    keys: Res<ButtonInput<KeyCode>>,
    mut overlays: Query<&mut Visibility, With<PerfUiRoot>>,
) {
    if !keys.just_pressed(TOGGLE_KEY) {
        return;
    }
    for mut visibility in &mut overlays {
        visibility.toggle_visible_hidden();
    }
}
