//! On-screen row of the control keys, highlighted while held.

use bevy::prelude::*;
use kcc_shared::Key;

use crate::{AppSystems, input::HeldKeys};

const RELEASED: Color = Color::srgb(0.0, 0.0, 1.0);
const PRESSED: Color = Color::srgb(1.0, 0.0, 0.0);

/// Display order, left to right.
const KEYS: [Key; 5] = [Key::Forward, Key::Left, Key::Back, Key::Right, Key::Shift];

#[derive(Component)]
struct KeyLabel(Key);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_key_row);
    app.add_systems(
        Update,
        highlight_held
            .run_if(resource_changed::<HeldKeys>)
            .in_set(AppSystems::Sync),
    );
}

fn spawn_key_row(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Key display"),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(20.0),
                bottom: Val::Px(20.0),
                column_gap: Val::Px(24.0),
                ..default()
            },
        ))
        .with_children(|row| {
            for key in KEYS {
                row.spawn((
                    KeyLabel(key),
                    Text::new(key.name().to_uppercase()),
                    TextFont::from_font_size(28.0),
                    TextColor(RELEASED),
                ));
            }
        });
}

fn highlight_held(held: Res<HeldKeys>, mut labels: Query<(&KeyLabel, &mut TextColor)>) {
    for (label, mut color) in &mut labels {
        color.0 = if held.0.is_pressed(label.0) {
            PRESSED
        } else {
            RELEASED
        };
    }
}
