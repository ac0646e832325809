//! Static scenery and the physics props, rendered from the simulation.

use bevy::{
    asset::RenderAssetUsages,
    mesh::{Indices, PrimitiveTopology},
    prelude::*,
};
use kcc_shared::{ColliderShapeDef, DemoScene, DemoSceneConfig, FixedTimestep, TerrainMesh};
use nalgebra::{UnitQuaternion, Vector3};

use crate::{AppSystems, character::Character, input::HeldKeys};

const SKY_COLOR: u32 = 0xa8def0;
/// Texture tiling across the whole terrain.
const TERRAIN_UV_REPEAT: f32 = 10.0;

/// The simulated world and the clock that paces its ticks.
#[derive(Resource)]
pub struct Sim {
    pub scene: DemoScene,
    pub clock: FixedTimestep,
}

/// Index into [`DemoScene::props`] of the body this entity renders.
#[derive(Component, Debug, Clone, Copy)]
pub struct PropBody(pub usize);

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(ClearColor(srgb_hex(SKY_COLOR)));
    app.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        ..default()
    });

    app.add_systems(Startup, setup);
    app.add_systems(
        Update,
        (
            simulate
                .run_if(resource_exists::<Sim>)
                .in_set(AppSystems::Simulate),
            sync_props
                .run_if(resource_exists::<Sim>)
                .in_set(AppSystems::Sync),
        ),
    );
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) -> Result {
    let scene = DemoScene::build(DemoSceneConfig::default())?;
    info!("World setup: {} props", scene.props().len());

    commands.spawn((
        Name::new("Terrain"),
        Transform::default(),
        Mesh3d(meshes.add(terrain_mesh(&scene.terrain().mesh(TERRAIN_UV_REPEAT)))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.32, 0.52, 0.22),
            perceptual_roughness: 0.6,
            metallic: 0.0,
            ..default()
        })),
    ));

    for (index, prop) in scene.props().iter().enumerate() {
        let Some(mesh) = prop_mesh(&prop.def.shape) else {
            warn!("prop {index} has no render mesh");
            continue;
        };
        commands.spawn((
            PropBody(index),
            Transform {
                translation: to_vec3(&prop.def.translation),
                rotation: to_quat(&prop.def.rotation),
                ..default()
            },
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(materials.add(srgb_hex(prop.def.color))),
        ));
    }

    commands.spawn((
        DirectionalLight {
            illuminance: 6_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(20.0, 30.0, 0.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.insert_resource(Sim {
        scene,
        clock: FixedTimestep::default(),
    });
    Ok(())
}

/// Run every tick that fell due during the last frame.
///
/// Each tick is the controller update followed by one world step; before the character
/// is attached the world steps on its own.
fn simulate(
    time: Res<Time>,
    mut sim: ResMut<Sim>,
    mut character: Option<ResMut<Character>>,
    held: Res<HeldKeys>,
) {
    let Sim { scene, clock } = &mut *sim;
    let steps = clock.accumulate(time.delta_secs());
    let dt = clock.interval();
    for _ in 0..steps {
        match character.as_deref_mut() {
            Some(character) => scene.tick(&mut character.controller, dt, &held.0),
            None => scene.step(dt),
        }
    }
}

/// Copy prop poses from the last physics step onto their entities.
fn sync_props(sim: Res<Sim>, mut props: Query<(&PropBody, &mut Transform)>) {
    let poses = sim.scene.body_poses().collect::<Vec<_>>();
    for (prop, mut transform) in &mut props {
        let Some((_, translation, rotation)) = poses.get(prop.0) else {
            continue;
        };
        transform.translation = to_vec3(translation);
        transform.rotation = to_quat(rotation);
    }
}

fn terrain_mesh(terrain: &TerrainMesh) -> Mesh {
    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, terrain.positions.clone())
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, terrain.normals.clone())
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, terrain.uvs.clone())
    .with_inserted_indices(Indices::U32(terrain.indices.clone()))
}

fn prop_mesh(shape: &ColliderShapeDef) -> Option<Mesh> {
    let mesh = match shape {
        ColliderShapeDef::Cuboid { half_extents } => Mesh::from(Cuboid::new(
            half_extents.x * 2.0,
            half_extents.y * 2.0,
            half_extents.z * 2.0,
        )),
        ColliderShapeDef::Sphere { radius } => Sphere::new(*radius).mesh().uv(32, 32),
        ColliderShapeDef::CylinderY {
            half_height,
            radius,
        } => Mesh::from(Cylinder::new(*radius, half_height * 2.0)),
        ColliderShapeDef::ConeY {
            half_height,
            radius,
        } => Mesh::from(Cone {
            radius: *radius,
            height: half_height * 2.0,
        }),
        ColliderShapeDef::Heightfield { .. } => return None,
    };
    Some(mesh)
}

pub fn srgb_hex(rgb: u32) -> Color {
    Color::srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

pub fn to_vec3(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn to_quat(q: &UnitQuaternion<f32>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}
