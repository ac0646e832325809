//! Rapier-backed physics world.
//!
//! Owns every Rapier structure needed to step the simulation and run scene queries.
//! The character controller never touches Rapier directly; it goes through the
//! [`KinematicWorld`] subset so it can be driven by a stand-in world in tests.
//!
//! Conventions
//! - Units are meters and seconds.
//! - `step()` advances by the fixed `integration_parameters.dt`.
//! - Scene queries see the state of the last `step()`: a body inserted after it is
//!   invisible to ray casts until the next step.

// Re-export Rapier so the client can use Rapier types without depending on `rapier3d`.
pub use rapier3d;

use rapier3d::na::{UnitQuaternion, Vector3};
use rapier3d::prelude::*;

use crate::{
    constants::GRAVITY_MPS2,
    error::SetupError,
    shapes::{BodyDef, ColliderShapeDef, collider_from_def},
};

/// The part of a physics world a kinematic character needs.
pub trait KinematicWorld {
    /// Current translation of `body`.
    fn body_translation(&self, body: RigidBodyHandle) -> Vector3<f32>;

    /// Target translation `body` reaches during the next step.
    fn set_next_kinematic_translation(&mut self, body: RigidBodyHandle, translation: Vector3<f32>);

    /// Cast `ray` up to `max_toi`, ignoring colliders attached to `exclude`.
    ///
    /// Returns the hit distance along the ray, or `None` when nothing is hit.
    fn cast_ray_excluding(
        &self,
        ray: &Ray,
        max_toi: f32,
        solid: bool,
        exclude: RigidBodyHandle,
    ) -> Option<f32>;
}

pub struct PhysicsWorld {
    pub gravity: Vector<f32>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub impulse_joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(Vector::new(0.0, -GRAVITY_MPS2, 0.0))
    }
}

impl PhysicsWorld {
    pub fn new(gravity: Vector<f32>) -> Self {
        Self {
            gravity,
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Fixed timestep used by `step()` (seconds).
    pub fn create_rigid_body(&mut self, def: &BodyDef) -> RigidBodyHandle {
        self.bodies.insert(def.rigid_body())
    }

    pub fn create_collider(
        &mut self,
        shape: &ColliderShapeDef,
        parent: RigidBodyHandle,
    ) -> ColliderHandle {
        self.colliders
            .insert_with_parent(collider_from_def(shape), parent, &mut self.bodies)
    }

    /// Create a body and attach its collider in one go.
    pub fn spawn(&mut self, def: &BodyDef) -> (RigidBodyHandle, ColliderHandle) {
        let body = self.create_rigid_body(def);
        let collider = self.create_collider(&def.shape, body);
        (body, collider)
    }

    /// Advance every body by one fixed timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Create a borrowed `QueryPipeline` view for scene queries.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    /// Distance along `ray` to the first collider accepted by `filter`.
    pub fn cast_ray(
        &self,
        ray: &Ray,
        max_toi: f32,
        solid: bool,
        filter: QueryFilter<'_>,
    ) -> Option<f32> {
        self.query_pipeline(filter)
            .cast_ray(ray, max_toi, solid)
            .map(|(_, toi)| toi)
    }

    /// Look up a body, reporting a setup error when the handle is stale.
    pub fn try_body(&self, handle: RigidBodyHandle) -> Result<&RigidBody, SetupError> {
        self.bodies
            .get(handle)
            .ok_or(SetupError::UnknownBody(handle))
    }

    pub fn translation(&self, handle: RigidBodyHandle) -> Vector3<f32> {
        *self.body(handle).translation()
    }

    pub fn rotation(&self, handle: RigidBodyHandle) -> UnitQuaternion<f32> {
        *self.body(handle).rotation()
    }

    fn body(&self, handle: RigidBodyHandle) -> &RigidBody {
        match self.bodies.get(handle) {
            Some(body) => body,
            None => panic!("rigid body {handle:?} is not part of this world"),
        }
    }
}

impl KinematicWorld for PhysicsWorld {
    fn body_translation(&self, body: RigidBodyHandle) -> Vector3<f32> {
        self.translation(body)
    }

    fn set_next_kinematic_translation(&mut self, body: RigidBodyHandle, translation: Vector3<f32>) {
        match self.bodies.get_mut(body) {
            Some(rb) => rb.set_next_kinematic_translation(translation),
            None => panic!("rigid body {body:?} is not part of this world"),
        }
    }

    fn cast_ray_excluding(
        &self,
        ray: &Ray,
        max_toi: f32,
        solid: bool,
        exclude: RigidBodyHandle,
    ) -> Option<f32> {
        self.cast_ray(
            ray,
            max_toi,
            solid,
            QueryFilter::default().exclude_rigid_body(exclude),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::BodyKind;

    fn ground() -> BodyDef {
        BodyDef::new(
            BodyKind::Fixed,
            ColliderShapeDef::Cuboid {
                half_extents: Vector::new(10.0, 0.5, 10.0),
            },
            Vector::new(0.0, -0.5, 0.0),
        )
    }

    #[test]
    fn ray_hits_ground_after_first_step() {
        let mut world = PhysicsWorld::default();
        world.spawn(&ground());
        world.step();

        let ray = Ray::new(Point::new(0.0, 2.0, 0.0), Vector::new(0.0, -1.0, 0.0));
        let toi = world
            .cast_ray(&ray, 5.0, true, QueryFilter::default())
            .expect("ground below the ray");
        assert!((toi - 2.0).abs() < 1.0e-4);

        assert!(world.cast_ray(&ray, 1.0, true, QueryFilter::default()).is_none());
    }

    #[test]
    fn excluded_body_is_invisible_to_the_ray() {
        let mut world = PhysicsWorld::default();
        world.spawn(&ground());
        let (ball, _) = world.spawn(&BodyDef::new(
            BodyKind::KinematicPositionBased,
            ColliderShapeDef::Sphere { radius: 0.5 },
            Vector::new(0.0, 1.0, 0.0),
        ));
        world.step();

        let ray = Ray::new(Point::new(0.0, 1.0, 0.0), Vector::new(0.0, -1.0, 0.0));
        let toi = world
            .cast_ray_excluding(&ray, 5.0, true, ball)
            .expect("ground below the ball");
        assert!((toi - 1.0).abs() < 1.0e-4);
    }

    #[test]
    fn kinematic_target_is_reached_after_step() {
        let mut world = PhysicsWorld::default();
        let (ball, _) = world.spawn(&BodyDef::new(
            BodyKind::KinematicPositionBased,
            ColliderShapeDef::Sphere { radius: 0.5 },
            Vector::new(0.0, 1.0, 0.0),
        ));

        world.set_next_kinematic_translation(ball, Vector3::new(1.0, 2.0, 3.0));
        world.step();
        assert!((world.translation(ball) - Vector3::new(1.0, 2.0, 3.0)).norm() < 1.0e-5);
    }

    #[test]
    fn dynamic_body_falls_under_gravity() {
        let mut world = PhysicsWorld::default();
        let (cube, _) = world.spawn(&BodyDef::new(
            BodyKind::Dynamic,
            ColliderShapeDef::Cuboid {
                half_extents: Vector::new(0.5, 0.5, 0.5),
            },
            Vector::new(0.0, 15.0, 0.0),
        ));
        for _ in 0..10 {
            world.step();
        }
        assert!(world.translation(cube).y < 15.0);
    }

    #[test]
    fn stale_handle_is_a_setup_error() {
        let world = PhysicsWorld::default();
        let missing = RigidBodyHandle::from_raw_parts(42, 0);
        assert!(matches!(
            world.try_body(missing),
            Err(SetupError::UnknownBody(_))
        ));
    }
}
