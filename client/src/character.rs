//! The soldier model and its controller.
//!
//! The model loads asynchronously. Once its glTF asset and animation player are both
//! available, [`attach`] builds the animation graph and attaches the controller to the
//! scene. Until then the world simulates without a character.

use bevy::{gltf::Gltf, prelude::*};
use kcc_shared::{CharacterController, ClipBlender, ClipSet, ControllerSettings, DemoSceneConfig};

use crate::{
    AppSystems,
    world::{Sim, to_quat, to_vec3},
};

const MODEL_PATH: &str = "models/Soldier.glb";

#[derive(Component)]
pub struct CharacterModel;

#[derive(Resource)]
struct CharacterAsset(Handle<Gltf>);

/// The attached character: its controller and the animation player it drives.
#[derive(Resource)]
pub struct Character {
    pub controller: CharacterController,
    pub player: Entity,
    pub nodes: ClipSet<AnimationNodeIndex>,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_model);
    app.add_systems(
        Update,
        (
            attach
                .run_if(resource_exists::<Sim>)
                .run_if(not(resource_exists::<Character>))
                .in_set(AppSystems::Simulate),
            sync_model
                .run_if(resource_exists::<Character>)
                .in_set(AppSystems::Sync),
        ),
    );
}

fn spawn_model(mut commands: Commands, asset_server: Res<AssetServer>) {
    let spawn = DemoSceneConfig::default().character_spawn;
    commands.spawn((
        Name::new("Soldier"),
        CharacterModel,
        SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(MODEL_PATH))),
        Transform::from_translation(to_vec3(&spawn)),
    ));
    commands.insert_resource(CharacterAsset(asset_server.load(MODEL_PATH)));
}

/// Second startup phase: runs every frame until the model is ready, then once more.
fn attach(
    mut commands: Commands,
    asset: Res<CharacterAsset>,
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    model: Single<Entity, With<CharacterModel>>,
    children: Query<&Children>,
    players: Query<(), With<AnimationPlayer>>,
    mut sim: ResMut<Sim>,
) -> Result {
    let Some(gltf) = gltfs.get(&asset.0) else {
        return Ok(());
    };
    let model = *model;
    // The scene instance spawns a few frames after the asset itself is loaded.
    let Some(player) = std::iter::once(model)
        .chain(children.iter_descendants(model))
        .find(|entity| players.contains(*entity))
    else {
        return Ok(());
    };

    let clips = ClipSet::from_named(
        gltf.named_animations
            .iter()
            .map(|(name, clip)| (name, clip.clone())),
    )?;
    let mut graph = AnimationGraph::new();
    let root = graph.root;
    let nodes = clips.map(|_, clip| graph.add_clip(clip.clone(), 1.0, root));
    commands
        .entity(player)
        .insert(AnimationGraphHandle(graphs.add(graph)));

    let controller = sim
        .scene
        .attach_character(ClipBlender::new(), ControllerSettings::default())?;
    info!("Character attached, animation player {player}");

    commands.insert_resource(Character {
        controller,
        player,
        nodes,
    });
    Ok(())
}

fn sync_model(character: Res<Character>, mut model: Single<&mut Transform, With<CharacterModel>>) {
    model.translation = to_vec3(&character.controller.model_position());
    model.rotation = to_quat(&character.controller.facing());
}
