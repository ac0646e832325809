use rapier3d::{
    na::{DMatrix, Translation3, UnitQuaternion},
    prelude::*,
};

/// How the physics engine drives a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Integrated from forces and contacts.
    Dynamic,
    /// Never moves. Created with sleeping disabled.
    Fixed,
    /// Moved only through `set_next_kinematic_translation`.
    KinematicPositionBased,
}

/// Supported collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vector<f32> },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { half_height: f32, radius: f32 },

    /// Y-aligned cone (meters).
    ConeY { half_height: f32, radius: f32 },

    /// Heights sampled on a regular grid, centered on the body origin.
    ///
    /// `heights` holds unit heights; `scale` stretches the grid to world size
    /// (x and z extents, y amplitude).
    Heightfield {
        heights: DMatrix<f32>,
        scale: Vector<f32>,
    },
}

/// Everything needed to create one body and its collider.
#[derive(Clone, Debug)]
pub struct BodyDef {
    pub kind: BodyKind,
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    pub shape: ColliderShapeDef,
    /// Display color as `0xRRGGBB`; only read by renderers.
    pub color: u32,
}

impl BodyDef {
    pub fn new(kind: BodyKind, shape: ColliderShapeDef, translation: Vector<f32>) -> Self {
        Self {
            kind,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
            color: 0xffffff,
        }
    }

    /// Rotation from Euler angles applied in X, then Y, then Z order (intrinsic).
    pub fn with_euler_xyz(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = euler_xyz(x, y, z);
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn rigid_body(&self) -> RigidBody {
        let builder = match self.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Fixed => RigidBodyBuilder::fixed().can_sleep(false),
            BodyKind::KinematicPositionBased => RigidBodyBuilder::kinematic_position_based(),
        };
        builder
            .pose(Isometry::from_parts(
                Translation3::from(self.translation),
                self.rotation,
            ))
            .build()
    }
}

/// Intrinsic X-Y-Z Euler rotation: `qx * qy * qz`.
pub fn euler_xyz(x: f32, y: f32, z: f32) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector::x_axis(), x)
        * UnitQuaternion::from_axis_angle(&Vector::y_axis(), y)
        * UnitQuaternion::from_axis_angle(&Vector::z_axis(), z)
}

/// Build a Rapier collider from a shape definition.
///
/// The collider is attached with identity local transform; the pose lives on the body.
pub fn collider_from_def(shape: &ColliderShapeDef) -> Collider {
    match shape {
        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius).build(),

        ColliderShapeDef::CylinderY {
            half_height,
            radius,
        } => ColliderBuilder::cylinder(*half_height, *radius).build(),

        ColliderShapeDef::ConeY {
            half_height,
            radius,
        } => ColliderBuilder::cone(*half_height, *radius).build(),

        ColliderShapeDef::Heightfield { heights, scale } => {
            ColliderBuilder::heightfield(heights.clone(), *scale).build()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn euler_single_axis_matches_axis_angle() {
        let q = euler_xyz(0.0, 0.0, FRAC_PI_2);
        let rotated = q * Vector::x();
        assert!((rotated - Vector::y()).norm() < 1.0e-6);
    }

    #[test]
    fn euler_applies_x_before_y_before_z_intrinsically() {
        // Intrinsic XYZ equals qx * qy * qz: a vector is rotated by z first, then y, then x.
        let q = euler_xyz(FRAC_PI_2, FRAC_PI_2, 0.0);
        let v = q * Vector::z();
        // qy takes +Z to +X, then qx leaves +X alone.
        assert!((v - Vector::x()).norm() < 1.0e-6);
    }

    #[test]
    fn fixed_body_keeps_its_pose() {
        let def = BodyDef::new(
            BodyKind::Fixed,
            ColliderShapeDef::Sphere { radius: 1.0 },
            Vector::new(1.0, 2.0, 3.0),
        );
        let body = def.rigid_body();
        assert!(body.is_fixed());
        assert!((body.translation() - Vector::new(1.0, 2.0, 3.0)).norm() < 1.0e-6);
    }
}
