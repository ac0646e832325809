//! Mirrors the controller's clip blend onto the model's `AnimationPlayer`.
//!
//! The blend itself (which clip plays, fade ramps, weights) lives in the controller's
//! `ClipBlender`; Bevy only plays the clips at those weights.

use bevy::prelude::*;
use kcc_shared::{Action, ClipSet};

use crate::{AppSystems, character::Character};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        mirror_blend
            .run_if(resource_exists::<Character>)
            .in_set(AppSystems::Sync),
    );
}

fn mirror_blend(
    character: Res<Character>,
    mut players: Query<&mut AnimationPlayer>,
    mut seen_restarts: Local<ClipSet<u32>>,
) {
    let Ok(mut player) = players.get_mut(character.player) else {
        return;
    };
    let blender = character.controller.animator();

    for action in Action::ALL {
        let node = *character.nodes.get(action);
        let clip = blender.clip(action);
        let seen = seen_restarts.get_mut(action);
        let restarted = *seen != clip.restarts;
        *seen = clip.restarts;

        if !clip.playing {
            if player.is_playing_animation(node) {
                player.stop(node);
            }
            continue;
        }

        if restarted || !player.is_playing_animation(node) {
            player.start(node).repeat().seek_to(clip.time);
        }
        if let Some(active) = player.animation_mut(node) {
            active.set_weight(blender.weight(action));
        }
    }
}
