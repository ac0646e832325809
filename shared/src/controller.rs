//! Kinematic character controller.
//!
//! One [`CharacterController::update`] per simulation tick:
//! 1. pick Idle / Walk / Run from input and cross-fade to it,
//! 2. derive a camera-relative planar heading and turn the model toward it,
//! 3. respawn if the body fell out of the world, otherwise
//! 4. re-center the camera, integrate the fall accumulator, cast down for ground,
//! 5. write the next kinematic translation of the body.
//!
//! The physics engine applies the written translation on its next `step()`; the
//! controller never moves the body any other way.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use rapier3d::prelude::{Ray, RigidBodyHandle};

use crate::{
    animation::{Action, AnimationBlend, ClipBlender},
    camera::OrbitCamera,
    constants::INITIAL_CAMERA_OFFSET,
    input::InputState,
    physics::KinematicWorld,
    settings::ControllerSettings,
    utils::{lerp, planar_forward_from_yaw, to_planar_unit, yaw_rotation},
};

pub struct CharacterController<A: AnimationBlend = ClipBlender> {
    settings: ControllerSettings,
    animator: A,
    camera: OrbitCamera,
    body: RigidBodyHandle,
    /// Downward ground ray; only its origin changes between ticks.
    ground_ray: Ray,

    current_action: Action,
    toggle_run: bool,
    fall_accum: f32,

    /// Displacement written to the body during the last tick.
    walk_direction: Vector3<f32>,
    model_position: Vector3<f32>,
    facing: UnitQuaternion<f32>,
}

impl<A: AnimationBlend> CharacterController<A> {
    /// Attach a controller to an existing kinematic body.
    ///
    /// Starts `initial_action` and places the camera at the default offset from the body.
    pub fn new(
        world: &impl KinematicWorld,
        body: RigidBodyHandle,
        mut animator: A,
        camera: OrbitCamera,
        initial_action: Action,
        settings: ControllerSettings,
    ) -> Self {
        animator.play(initial_action);

        let translation = world.body_translation(body);
        let mut controller = Self {
            settings,
            animator,
            camera,
            body,
            ground_ray: Ray::new(Point3::origin(), Vector3::new(0.0, -1.0, 0.0)),
            current_action: initial_action,
            toggle_run: settings.start_running,
            fall_accum: 0.0,
            walk_direction: Vector3::zeros(),
            model_position: translation,
            facing: UnitQuaternion::identity(),
        };
        controller.update_camera_target(translation, Vector3::from(INITIAL_CAMERA_OFFSET));
        controller
    }

    /// Flip between walking and running on directional input.
    pub fn switch_run_toggle(&mut self) {
        self.toggle_run = !self.toggle_run;
        log::debug!("run toggle {}", if self.toggle_run { "on" } else { "off" });
    }

    pub fn update(&mut self, world: &mut impl KinematicWorld, dt: f32, input: &InputState) {
        self.select_action(input);
        self.animator.advance(dt);

        let velocity = self.plan_planar_motion(input);

        let translation = world.body_translation(self.body);
        if translation.y < self.settings.respawn_threshold_y {
            log::info!(
                "character fell to y={:.2}, respawning at {:?}",
                translation.y,
                self.settings.respawn_point
            );
            world.set_next_kinematic_translation(self.body, self.settings.respawn_point);
            return;
        }

        // Captured before the model follows the body so the camera keeps its offset.
        let camera_offset = self.camera.position - self.model_position;
        self.model_position = translation;
        self.update_camera_target(translation, camera_offset);

        self.walk_direction.y += lerp(
            self.fall_accum,
            -self.settings.gravity * dt,
            self.settings.fall_lerp,
        );
        self.fall_accum = self.walk_direction.y;

        self.ground_ray.origin = Point3::from(translation);
        if let Some(toi) = world.cast_ray_excluding(
            &self.ground_ray,
            self.settings.ground_ray_length,
            self.settings.ground_ray_solid,
            self.body,
        ) {
            let point = self.ground_ray.point_at(toi);
            let diff = translation.y - (point.y + self.settings.body_radius);
            if diff < 0.0 {
                self.fall_accum = 0.0;
                self.walk_direction.y = lerp(0.0, diff.abs(), self.settings.ground_push_lerp);
            }
        }

        // Vertical is already a per-tick displacement; only planar motion scales with speed.
        self.walk_direction.x *= velocity * dt;
        self.walk_direction.z *= velocity * dt;

        world.set_next_kinematic_translation(self.body, translation + self.walk_direction);
    }

    /// Cross-fade to the action implied by `input`, if it changed.
    fn select_action(&mut self, input: &InputState) {
        let direction_pressed = input.any_direction();
        let play = if direction_pressed && self.toggle_run {
            Action::Run
        } else if direction_pressed {
            Action::Walk
        } else {
            Action::Idle
        };

        if play == self.current_action {
            return;
        }

        let fade = self.settings.fade_duration;
        self.animator.fade_out(self.current_action, fade);
        self.animator.reset(play);
        self.animator.fade_in(play, fade);
        self.animator.play(play);
        log::debug!("locomotion {} -> {}", self.current_action, play);
        self.current_action = play;
    }

    /// Reset the working direction to the unit planar heading and return the speed to apply.
    fn plan_planar_motion(&mut self, input: &InputState) -> f32 {
        self.walk_direction = Vector3::zeros();
        if !self.current_action.is_moving() {
            return 0.0;
        }

        let camera_yaw = self.camera.view_yaw(&self.model_position);
        let direction_offset = input.direction_offset();

        let heading = yaw_rotation(camera_yaw + direction_offset);
        self.facing = self
            .facing
            .try_slerp(&heading, self.settings.facing_slerp, 1.0e-6)
            .unwrap_or(heading);

        let forward = to_planar_unit(self.camera.forward())
            .unwrap_or_else(|| planar_forward_from_yaw(camera_yaw));
        self.walk_direction = yaw_rotation(direction_offset) * forward;

        if self.current_action == Action::Run {
            self.settings.run_velocity
        } else {
            self.settings.walk_velocity
        }
    }

    fn update_camera_target(&mut self, translation: Vector3<f32>, offset: Vector3<f32>) {
        self.camera.position = translation + offset;
        self.camera.target = translation + Vector3::new(0.0, self.settings.camera_target_height, 0.0);
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn current_action(&self) -> Action {
        self.current_action
    }

    pub fn is_running(&self) -> bool {
        self.toggle_run
    }

    /// Vertical displacement carried over between airborne ticks.
    pub fn fall_accum(&self) -> f32 {
        self.fall_accum
    }

    /// Displacement requested from the physics world during the last tick.
    pub fn walk_direction(&self) -> Vector3<f32> {
        self.walk_direction
    }

    /// Where the rendered model stands (the body translation read last tick).
    pub fn model_position(&self) -> Vector3<f32> {
        self.model_position
    }

    pub fn facing(&self) -> UnitQuaternion<f32> {
        self.facing
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::CONTROLLER_BODY_RADIUS, input::Key};
    use std::cell::Cell;
    use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2};

    const DT: f32 = 1.0 / 60.0;

    /// Infinite flat ground (optional) and a single kinematic body.
    struct FlatWorld {
        ground_y: Option<f32>,
        translation: Vector3<f32>,
        next: Option<Vector3<f32>>,
        ray_casts: Cell<usize>,
    }

    impl FlatWorld {
        fn new(ground_y: Option<f32>, translation: Vector3<f32>) -> Self {
            Self {
                ground_y,
                translation,
                next: None,
                ray_casts: Cell::new(0),
            }
        }

        fn step(&mut self) {
            if let Some(next) = self.next.take() {
                self.translation = next;
            }
        }
    }

    impl KinematicWorld for FlatWorld {
        fn body_translation(&self, _body: RigidBodyHandle) -> Vector3<f32> {
            self.translation
        }

        fn set_next_kinematic_translation(
            &mut self,
            _body: RigidBodyHandle,
            translation: Vector3<f32>,
        ) {
            self.next = Some(translation);
        }

        fn cast_ray_excluding(
            &self,
            ray: &Ray,
            max_toi: f32,
            solid: bool,
            _exclude: RigidBodyHandle,
        ) -> Option<f32> {
            self.ray_casts.set(self.ray_casts.get() + 1);

            let ground_y = self.ground_y?;
            if ray.dir.y >= 0.0 {
                return None;
            }
            let mut toi = (ray.origin.y - ground_y) / -ray.dir.y;
            if toi < 0.0 {
                if !solid {
                    return None;
                }
                toi = 0.0;
            }
            (toi <= max_toi).then_some(toi)
        }
    }

    /// Records every call made against the animation layer.
    #[derive(Default)]
    struct RecordingAnimator {
        calls: Vec<(&'static str, Action)>,
        advanced: f32,
    }

    impl AnimationBlend for RecordingAnimator {
        fn play(&mut self, action: Action) {
            self.calls.push(("play", action));
        }
        fn reset(&mut self, action: Action) {
            self.calls.push(("reset", action));
        }
        fn fade_in(&mut self, action: Action, _duration: f32) {
            self.calls.push(("fade_in", action));
        }
        fn fade_out(&mut self, action: Action, _duration: f32) {
            self.calls.push(("fade_out", action));
        }
        fn advance(&mut self, dt: f32) {
            self.advanced += dt;
        }
    }

    fn body() -> RigidBodyHandle {
        RigidBodyHandle::from_raw_parts(0, 0)
    }

    fn controller(world: &FlatWorld) -> CharacterController<RecordingAnimator> {
        controller_with(world, ControllerSettings::default())
    }

    fn controller_with(
        world: &FlatWorld,
        settings: ControllerSettings,
    ) -> CharacterController<RecordingAnimator> {
        let camera = OrbitCamera::new(Vector3::zeros(), Vector3::zeros());
        CharacterController::new(
            world,
            body(),
            RecordingAnimator::default(),
            camera,
            Action::Idle,
            settings,
        )
    }

    fn count(calls: &[(&'static str, Action)], op: &str) -> usize {
        calls.iter().filter(|(name, _)| *name == op).count()
    }

    #[test]
    fn no_direction_stays_idle_without_planar_motion() {
        let mut world = FlatWorld::new(Some(0.0), Vector3::new(0.0, CONTROLLER_BODY_RADIUS, 0.0));
        let mut ctl = controller(&world);
        let input = InputState::with_pressed(&[Key::Shift]);

        for _ in 0..5 {
            ctl.update(&mut world, DT, &input);
            world.step();
            assert_eq!(ctl.current_action(), Action::Idle);
            assert_eq!(ctl.walk_direction().x, 0.0);
            assert_eq!(ctl.walk_direction().z, 0.0);
        }
    }

    #[test]
    fn forward_while_running_moves_along_camera_forward_and_falls() {
        let mut world = FlatWorld::new(None, Vector3::new(0.0, 10.0, 0.0));
        let mut ctl = controller(&world);
        let input = InputState::with_pressed(&[Key::Forward]);

        ctl.update(&mut world, DT, &input);

        assert_eq!(ctl.current_action(), Action::Run);
        let step = ctl.walk_direction();
        let expected = ctl.settings().run_velocity * DT;
        // Camera sits behind on +Z, so forward is -Z.
        assert!(step.x.abs() < 1.0e-6);
        assert!((step.z + expected).abs() < 1.0e-6);
        assert!(step.y < 0.0);
        assert_eq!(world.next, Some(Vector3::new(0.0, 10.0, 0.0) + step));
    }

    #[test]
    fn diagonal_walk_uses_quarter_turn_offset() {
        let mut world = FlatWorld::new(None, Vector3::new(0.0, 10.0, 0.0));
        let mut ctl = controller(&world);
        ctl.switch_run_toggle();
        let input = InputState::with_pressed(&[Key::Forward, Key::Left]);

        ctl.update(&mut world, DT, &input);

        assert_eq!(ctl.current_action(), Action::Walk);
        let planar = Vector3::new(ctl.walk_direction().x, 0.0, ctl.walk_direction().z)
            / (ctl.settings().walk_velocity * DT);
        assert!((planar - Vector3::new(-FRAC_1_SQRT_2, 0.0, -FRAC_1_SQRT_2)).norm() < 1.0e-5);
    }

    #[test]
    fn transition_issues_one_fade_pair() {
        let mut world = FlatWorld::new(None, Vector3::new(0.0, 10.0, 0.0));
        let mut ctl = controller(&world);
        assert_eq!(ctl.animator().calls, vec![("play", Action::Idle)]);

        let input = InputState::with_pressed(&[Key::Forward]);
        ctl.update(&mut world, DT, &input);
        let calls = &ctl.animator().calls;
        assert_eq!(count(calls, "fade_out"), 1);
        assert_eq!(count(calls, "fade_in"), 1);
        assert!(calls.contains(&("fade_out", Action::Idle)));
        assert!(calls.contains(&("fade_in", Action::Run)));
        assert!(calls.contains(&("reset", Action::Run)));

        // Holding the same input does not start another transition.
        world.step();
        ctl.update(&mut world, DT, &input);
        assert_eq!(count(&ctl.animator().calls, "fade_out"), 1);
        assert!((ctl.animator().advanced - 2.0 * DT).abs() < 1.0e-6);
    }

    #[test]
    fn walking_from_idle_fades_to_walk() {
        let mut world = FlatWorld::new(None, Vector3::new(0.0, 10.0, 0.0));
        let mut ctl = controller(&world);
        ctl.switch_run_toggle();

        ctl.update(&mut world, DT, &InputState::with_pressed(&[Key::Left]));

        assert_eq!(ctl.current_action(), Action::Walk);
        let calls = &ctl.animator().calls[1..];
        assert_eq!(
            calls,
            &[
                ("fade_out", Action::Idle),
                ("reset", Action::Walk),
                ("fade_in", Action::Walk),
                ("play", Action::Walk),
            ]
        );
    }

    #[test]
    fn toggling_run_while_walking_fades_walk_into_run() {
        let mut world = FlatWorld::new(None, Vector3::new(0.0, 10.0, 0.0));
        let mut ctl = controller(&world);
        ctl.switch_run_toggle();
        let input = InputState::with_pressed(&[Key::Forward]);

        ctl.update(&mut world, DT, &input);
        world.step();
        assert_eq!(ctl.current_action(), Action::Walk);
        let before = ctl.animator().calls.len();

        ctl.switch_run_toggle();
        ctl.update(&mut world, DT, &input);

        assert_eq!(ctl.current_action(), Action::Run);
        let calls = &ctl.animator().calls[before..];
        assert_eq!(
            calls,
            &[
                ("fade_out", Action::Walk),
                ("reset", Action::Run),
                ("fade_in", Action::Run),
                ("play", Action::Run),
            ]
        );
        assert_eq!(count(&ctl.animator().calls, "fade_out"), 2);
        assert_eq!(count(&ctl.animator().calls, "fade_in"), 2);
    }

    #[test]
    fn fall_accumulator_strictly_decreases_without_ground() {
        let mut world = FlatWorld::new(None, Vector3::new(0.0, 50.0, 0.0));
        let mut ctl = controller(&world);
        let input = InputState::new();

        let mut previous = ctl.fall_accum();
        for _ in 0..30 {
            ctl.update(&mut world, DT, &input);
            world.step();
            assert!(ctl.fall_accum() < previous);
            previous = ctl.fall_accum();
        }
        assert!(previous > -ctl.settings().gravity * DT);
    }

    #[test]
    fn resting_on_ground_does_not_drift() {
        let start = CONTROLLER_BODY_RADIUS;
        let mut world = FlatWorld::new(Some(0.0), Vector3::new(0.0, start, 0.0));
        let mut ctl = controller(&world);
        let input = InputState::new();

        for _ in 0..240 {
            ctl.update(&mut world, DT, &input);
            world.step();
            assert!((world.translation.y - start).abs() < 0.02);
        }
        assert!(ctl.fall_accum().abs() < 0.02);
    }

    #[test]
    fn sunk_body_is_pushed_up_halfway() {
        let mut world = FlatWorld::new(Some(0.0), Vector3::new(0.0, 0.1, 0.0));
        let mut ctl = controller(&world);

        ctl.update(&mut world, DT, &InputState::new());

        let diff = 0.1 - CONTROLLER_BODY_RADIUS;
        assert_eq!(ctl.fall_accum(), 0.0);
        assert!((ctl.walk_direction().y - diff.abs() * 0.5).abs() < 1.0e-6);
    }

    #[test]
    fn hollow_ray_lets_a_sunk_body_keep_falling() {
        let mut world = FlatWorld::new(Some(0.0), Vector3::new(0.0, -0.1, 0.0));
        let settings = ControllerSettings {
            ground_ray_solid: false,
            ..Default::default()
        };
        let mut ctl = controller_with(&world, settings);

        ctl.update(&mut world, DT, &InputState::new());

        assert_eq!(world.ray_casts.get(), 1);
        assert!(ctl.fall_accum() < 0.0);
        assert!(ctl.walk_direction().y < 0.0);
        let next = world.next.expect("target written");
        assert!(next.y < -0.1);
    }

    #[test]
    fn below_threshold_teleports_without_casting() {
        let mut world = FlatWorld::new(Some(0.0), Vector3::new(3.0, -2.0, 4.0));
        let mut ctl = controller(&world);
        let camera_before = *ctl.camera();
        let model_before = ctl.model_position();

        ctl.update(&mut world, DT, &InputState::with_pressed(&[Key::Forward]));
        world.step();

        assert_eq!(world.translation, Vector3::new(0.0, 10.0, 0.0));
        assert_eq!(world.ray_casts.get(), 0);
        assert_eq!(ctl.fall_accum(), 0.0);
        assert_eq!(*ctl.camera(), camera_before);
        assert_eq!(ctl.model_position(), model_before);
    }

    #[test]
    fn camera_keeps_offset_and_looks_above_the_body() {
        let mut world = FlatWorld::new(None, Vector3::new(1.0, 5.0, 1.0));
        let mut ctl = controller(&world);
        let offset = ctl.camera().position - ctl.model_position();
        assert_eq!(offset, Vector3::from(INITIAL_CAMERA_OFFSET));

        let input = InputState::with_pressed(&[Key::Forward]);
        for _ in 0..3 {
            ctl.update(&mut world, DT, &input);
            world.step();
        }
        let body = ctl.model_position();
        assert!((ctl.camera().position - body - offset).norm() < 1.0e-5);
        assert!((ctl.camera().target - body - Vector3::new(0.0, 1.0, 0.0)).norm() < 1.0e-6);
    }

    #[test]
    fn facing_turns_a_fraction_per_tick() {
        let mut world = FlatWorld::new(None, Vector3::new(0.0, 10.0, 0.0));
        let mut ctl = controller(&world);

        ctl.update(&mut world, DT, &InputState::with_pressed(&[Key::Right]));

        // Camera yaw is zero, right is -π/2: a fifth of the way there after one tick.
        let expected = yaw_rotation(-FRAC_PI_2 * 0.2);
        assert!(ctl.facing().angle_to(&expected) < 1.0e-4);
    }

    #[test]
    fn run_toggle_selects_walk() {
        let mut world = FlatWorld::new(None, Vector3::new(0.0, 10.0, 0.0));
        let mut ctl = controller(&world);
        assert!(ctl.is_running());
        ctl.switch_run_toggle();
        assert!(!ctl.is_running());

        ctl.update(&mut world, DT, &InputState::with_pressed(&[Key::Back]));
        assert_eq!(ctl.current_action(), Action::Walk);
    }
}
