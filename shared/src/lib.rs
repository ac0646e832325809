pub mod animation;
pub mod bitmask_flags;
pub mod camera;
pub mod constants;
pub mod controller;
pub mod error;
pub mod input;
pub mod physics;
pub mod scene;
pub mod settings;
pub mod shapes;
pub mod terrain;
pub mod timestep;
pub mod utils;

pub use animation::{Action, AnimationBlend, ClipBlender, ClipSet, ClipState};
pub use bitmask_flags::{BitmaskFlags, FlagBitmask};
pub use camera::OrbitCamera;
pub use controller::CharacterController;
pub use error::SetupError;
pub use input::{InputState, Key};
pub use physics::{KinematicWorld, PhysicsWorld};
pub use scene::{DemoScene, DemoSceneConfig, Prop};
pub use settings::{ControllerSettings, OrbitLimits};
pub use shapes::{BodyDef, BodyKind, ColliderShapeDef, collider_from_def};
pub use terrain::{Terrain, TerrainMesh};
pub use timestep::FixedTimestep;
