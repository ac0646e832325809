// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

#[cfg(feature = "dev_native")]
mod debug_tools;

mod animation;
mod camera;
mod character;
mod input;
mod key_display;
mod world;

use bevy::prelude::*;

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

pub struct AppPlugin;
impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Window {
                title: "Character Controls".to_string(),
                fit_canvas_to_parent: true,
                ..default()
            }
            .into(),
            ..default()
        }));

        // Frame order: read input, orbit the camera, run the due simulation ticks, then
        // copy simulation state onto entities.
        app.configure_sets(
            Update,
            (
                AppSystems::RecordInput,
                AppSystems::Orbit,
                AppSystems::Simulate,
                AppSystems::Sync,
            )
                .chain(),
        );

        app.add_plugins((
            input::plugin,
            world::plugin,
            character::plugin,
            camera::plugin,
            animation::plugin,
            key_display::plugin,
        ));

        #[cfg(feature = "dev_native")]
        app.add_plugins(debug_tools::plugin);
    }
}

#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
enum AppSystems {
    RecordInput,
    Orbit,
    Simulate,
    Sync,
}
