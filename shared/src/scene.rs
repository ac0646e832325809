//! The demo playground: random terrain, a tilted slab and a handful of falling props.
//!
//! Startup is two-phase. [`DemoScene::build`] creates the world and everything static or
//! dynamic in it; [`DemoScene::attach_character`] runs once the character's animation
//! clips are known (the client loads them asynchronously) and returns the controller.
//! Neither phase can observe the other half-initialized.

use nalgebra::{UnitQuaternion, Vector3};
use rapier3d::prelude::RigidBodyHandle;

use crate::{
    animation::{Action, AnimationBlend},
    camera::OrbitCamera,
    controller::CharacterController,
    error::SetupError,
    input::InputState,
    physics::PhysicsWorld,
    settings::ControllerSettings,
    shapes::{BodyDef, BodyKind, ColliderShapeDef},
    terrain::Terrain,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DemoSceneConfig {
    pub terrain_subdivisions: usize,
    /// Terrain extent along x and z, height amplitude along y (meters).
    pub terrain_scale: Vector3<f32>,
    pub terrain_seed: u32,
    pub character_spawn: Vector3<f32>,
    pub camera_position: Vector3<f32>,
}

impl Default for DemoSceneConfig {
    fn default() -> Self {
        Self {
            terrain_subdivisions: 20,
            terrain_scale: Vector3::new(70.0, 3.0, 70.0),
            terrain_seed: 0x5eed,
            character_spawn: Vector3::new(-1.0, 3.0, 1.0),
            camera_position: Vector3::new(-13.0, 5.0, 10.0),
        }
    }
}

/// A prop created by the scene, kept with its definition for renderers.
#[derive(Clone, Debug)]
pub struct Prop {
    pub handle: RigidBodyHandle,
    pub def: BodyDef,
}

pub struct DemoScene {
    config: DemoSceneConfig,
    world: PhysicsWorld,
    terrain: Terrain,
    terrain_body: RigidBodyHandle,
    props: Vec<Prop>,
    character: Option<RigidBodyHandle>,
}

impl DemoScene {
    /// Create the world, the terrain and the props.
    pub fn build(config: DemoSceneConfig) -> Result<Self, SetupError> {
        let mut world = PhysicsWorld::default();

        let terrain = Terrain::generate(
            config.terrain_subdivisions,
            config.terrain_scale,
            config.terrain_seed,
        )?;
        let (terrain_body, _) = world.spawn(&BodyDef::new(
            BodyKind::Fixed,
            terrain.collider_shape(),
            Vector3::zeros(),
        ));

        let props = prop_defs(config.terrain_scale)
            .into_iter()
            .map(|def| Prop {
                handle: world.spawn(&def).0,
                def,
            })
            .collect::<Vec<_>>();

        log::info!(
            "scene built: {}x{} terrain of {:?}, {} props",
            config.terrain_subdivisions,
            config.terrain_subdivisions,
            config.terrain_scale,
            props.len()
        );

        Ok(Self {
            config,
            world,
            terrain,
            terrain_body,
            props,
            character: None,
        })
    }

    /// Create the character's kinematic ball at the spawn point and hand back its controller.
    ///
    /// The controller starts on the Idle clip.
    pub fn attach_character<A: AnimationBlend>(
        &mut self,
        animator: A,
        settings: ControllerSettings,
    ) -> Result<CharacterController<A>, SetupError> {
        let (body, _) = self.world.spawn(&BodyDef::new(
            BodyKind::KinematicPositionBased,
            ColliderShapeDef::Sphere {
                radius: settings.body_radius,
            },
            self.config.character_spawn,
        ));
        let translation = *self.world.try_body(body)?.translation();
        self.character = Some(body);

        let camera = OrbitCamera::new(
            self.config.camera_position,
            translation + Vector3::new(0.0, settings.camera_target_height, 0.0),
        );
        log::info!("character attached at {translation:?}");

        Ok(CharacterController::new(
            &self.world,
            body,
            animator,
            camera,
            Action::Idle,
            settings,
        ))
    }

    /// One simulation tick: the controller writes its kinematic target, then the world steps.
    pub fn tick<A: AnimationBlend>(
        &mut self,
        controller: &mut CharacterController<A>,
        dt: f32,
        input: &InputState,
    ) {
        self.world.integration_parameters.dt = dt;
        controller.update(&mut self.world, dt, input);
        self.world.step();
    }

    /// Step the world alone, before a character is attached.
    pub fn step(&mut self, dt: f32) {
        self.world.integration_parameters.dt = dt;
        self.world.step();
    }

    /// `(index, translation, rotation)` of every prop, as of the last step.
    pub fn body_poses(
        &self,
    ) -> impl Iterator<Item = (usize, Vector3<f32>, UnitQuaternion<f32>)> + '_ {
        self.props.iter().enumerate().map(|(index, prop)| {
            (
                index,
                self.world.translation(prop.handle),
                self.world.rotation(prop.handle),
            )
        })
    }

    pub fn config(&self) -> &DemoSceneConfig {
        &self.config
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn terrain_body(&self) -> RigidBodyHandle {
        self.terrain_body
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn character(&self) -> Option<RigidBodyHandle> {
        self.character
    }
}

fn prop_defs(terrain_scale: Vector3<f32>) -> Vec<BodyDef> {
    let sphere = ColliderShapeDef::Sphere { radius: 0.7 };
    vec![
        BodyDef::new(
            BodyKind::Fixed,
            ColliderShapeDef::Cuboid {
                half_extents: Vector3::new(10.0, 0.8, 10.0),
            },
            Vector3::new(terrain_scale.x / 2.0, 2.5, 0.0),
        )
        .with_euler_xyz(0.0, 0.0, 0.3)
        .with_color(0xffc0cb),
        BodyDef::new(
            BodyKind::Dynamic,
            ColliderShapeDef::Cuboid {
                half_extents: Vector3::new(0.5, 0.5, 0.5),
            },
            Vector3::new(0.0, 15.0, 0.0),
        )
        .with_euler_xyz(0.0, 0.4, 0.7)
        .with_color(0xffa500),
        BodyDef::new(BodyKind::Dynamic, sphere.clone(), Vector3::new(4.0, 15.0, 2.0))
            .with_euler_xyz(0.0, 1.0, 0.0)
            .with_color(0x0000ff),
        BodyDef::new(BodyKind::Dynamic, sphere, Vector3::new(0.0, 15.0, 0.0))
            .with_euler_xyz(0.0, 1.0, 0.0)
            .with_color(0xff0000),
        BodyDef::new(
            BodyKind::Dynamic,
            ColliderShapeDef::CylinderY {
                half_height: 1.0,
                radius: 0.7,
            },
            Vector3::new(-7.0, 15.0, 8.0),
        )
        .with_euler_xyz(0.0, 1.0, 0.0)
        .with_color(0x008000),
        BodyDef::new(
            BodyKind::Dynamic,
            ColliderShapeDef::ConeY {
                half_height: 1.0,
                radius: 1.0,
            },
            Vector3::new(7.0, 15.0, -8.0),
        )
        .with_euler_xyz(0.0, 1.0, 0.0)
        .with_color(0x800080),
    ]
}
