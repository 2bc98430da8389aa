use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::physics::CharacterMotor;
use crate::simulation::FrameTime;

use super::{ControllerConfig, DependentSet, Health, LifeGate, LifeState, PlayerInput, PlayerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    Ground,
    /// Airborne, but still inside the leniency window.
    Lenient,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub life: LifeState,
    pub grounded: bool,
    pub velocity: Vec3,
    pub jump: Option<JumpKind>,
    pub yaw_degrees: f32,
}

/// The collaborators one player needs for a frame.
pub struct PlayerRig<'a, M, D> {
    pub motor: &'a mut M,
    pub orientation: &'a mut Quat,
    pub health: &'a Health,
    pub gate: &'a LifeGate,
    pub dependents: &'a mut D,
}

#[derive(Debug, Clone)]
pub struct PlayerController {
    config: ControllerConfig,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            config: ControllerConfig::default(),
        }
    }
}

impl PlayerController {
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn update<M, D>(
        &self,
        state: &mut PlayerState,
        input: &PlayerInput,
        frame: FrameTime,
        rig: PlayerRig<'_, M, D>,
    ) -> FrameReport
    where
        M: CharacterMotor,
        D: DependentSet,
    {
        let life = rig.gate.evaluate(rig.health, rig.dependents);
        state.alive = life.is_alive();

        if !life.is_alive() {
            return FrameReport {
                life,
                grounded: state.grounded,
                velocity: state.move_direction,
                jump: None,
                yaw_degrees: yaw_degrees(*rig.orientation),
            };
        }

        let input = input.sanitized();
        let jump = self.resolve_movement(state, &input, frame, rig.motor, *rig.orientation);
        self.resolve_rotation(rig.orientation, input.look_horizontal, frame.dt);

        FrameReport {
            life,
            grounded: state.grounded,
            velocity: state.move_direction,
            jump,
            yaw_degrees: yaw_degrees(*rig.orientation),
        }
    }

    /// Resolves this frame's velocity, hands `velocity * dt` to the motor and
    /// returns the jump that fired, if any.
    pub fn resolve_movement<M: CharacterMotor>(
        &self,
        state: &mut PlayerState,
        input: &PlayerInput,
        frame: FrameTime,
        motor: &mut M,
        orientation: Quat,
    ) -> Option<JumpKind> {
        let grounded = motor.is_grounded();

        let (mut velocity, jump) = if grounded {
            self.grounded_velocity(state, input, frame, orientation)
        } else {
            self.airborne_velocity(state, input, frame, orientation)
        };

        velocity.y -= self.config.gravity * frame.dt;

        if grounded && velocity.y < 0.0 {
            velocity.y = self.config.ground_snap_velocity;
        }

        motor.move_by(velocity * frame.dt);

        state.move_direction = velocity;
        state.grounded = grounded;
        jump
    }

    fn grounded_velocity(
        &self,
        state: &mut PlayerState,
        input: &PlayerInput,
        frame: FrameTime,
        orientation: Quat,
    ) -> (Vec3, Option<JumpKind>) {
        state.replenish(frame.now, self.config.jump_time_leniency);

        let local = Vec3::new(input.horizontal, 0.0, input.vertical);
        let mut velocity = orientation * local * self.config.move_speed;

        let mut jump = None;
        if input.jump_pressed {
            velocity.y = self.config.jump_power;
            jump = Some(JumpKind::Ground);
        }

        (velocity, jump)
    }

    fn airborne_velocity(
        &self,
        state: &mut PlayerState,
        input: &PlayerInput,
        frame: FrameTime,
        orientation: Quat,
    ) -> (Vec3, Option<JumpKind>) {
        let speed = self.config.move_speed;
        let local = Vec3::new(
            input.horizontal * speed,
            state.move_direction.y,
            input.vertical * speed,
        );
        let mut velocity = orientation * local;

        if !input.jump_pressed {
            return (velocity, None);
        }

        // The grace window is checked first so a late ground jump keeps the double jump.
        let jump = if state.is_lenient(frame.now) {
            Some(JumpKind::Lenient)
        } else if state.consume_double_jump() {
            Some(JumpKind::Double)
        } else {
            None
        };

        if jump.is_some() {
            velocity.y = self.config.jump_power;
        }

        (velocity, jump)
    }

    /// Adds `look * look_speed * dt` degrees of yaw, keeping pitch and roll.
    pub fn resolve_rotation(&self, orientation: &mut Quat, look: f32, dt: f32) {
        let delta = (look * self.config.look_speed * dt).to_radians();
        if delta == 0.0 {
            return;
        }

        let (yaw, pitch, roll) = orientation.to_euler(EulerRot::YXZ);
        *orientation = Quat::from_euler(EulerRot::YXZ, yaw + delta, pitch, roll).normalize();
    }
}

/// Yaw of `orientation` in degrees, wrapped to `[0, 360)`.
pub fn yaw_degrees(orientation: Quat) -> f32 {
    let (yaw, _, _) = orientation.to_euler(EulerRot::YXZ);
    let degrees = yaw.to_degrees().rem_euclid(360.0);
    if degrees >= 360.0 { 0.0 } else { degrees }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{EntityType, World};

    #[derive(Default)]
    struct MockMotor {
        grounded: bool,
        moves: Vec<Vec3>,
    }

    impl CharacterMotor for MockMotor {
        fn is_grounded(&self) -> bool {
            self.grounded
        }

        fn move_by(&mut self, translation: Vec3) {
            self.moves.push(translation);
        }
    }

    fn controller(config: ControllerConfig) -> PlayerController {
        PlayerController::new(config).unwrap()
    }

    fn step(
        controller: &PlayerController,
        state: &mut PlayerState,
        motor: &mut MockMotor,
        input: PlayerInput,
        now: f64,
        dt: f32,
    ) -> Option<JumpKind> {
        controller.resolve_movement(state, &input, FrameTime::new(dt, now), motor, Quat::IDENTITY)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn grounded_jump_sets_jump_power() {
        let controller = controller(ControllerConfig {
            gravity: 0.0,
            ..Default::default()
        });
        let mut state = PlayerState::new();
        let mut motor = MockMotor {
            grounded: true,
            ..Default::default()
        };

        let jump = step(&controller, &mut state, &mut motor, PlayerInput::jump(), 0.0, 0.02);

        assert_eq!(jump, Some(JumpKind::Ground));
        assert_eq!(state.move_direction.y, controller.config().jump_power);
    }

    #[test]
    fn grounded_jump_integrates_gravity_once() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new();
        let mut motor = MockMotor {
            grounded: true,
            ..Default::default()
        };

        step(&controller, &mut state, &mut motor, PlayerInput::jump(), 0.0, 0.1);

        assert!(approx(state.move_direction.y, 8.0 - 9.81 * 0.1));
        assert!(approx(motor.moves[0].y, (8.0 - 9.81 * 0.1) * 0.1));
    }

    #[test]
    fn grounded_without_jump_snaps_down() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new();
        let mut motor = MockMotor {
            grounded: true,
            ..Default::default()
        };

        step(&controller, &mut state, &mut motor, PlayerInput::IDLE, 0.0, 0.02);

        assert_eq!(state.move_direction.y, -0.3);
        assert!(approx(motor.moves[0].y, -0.3 * 0.02));
        assert!(state.double_jump_available);
        assert!((state.lenient_until - 0.1).abs() < 1e-6);
    }

    #[test]
    fn airborne_descends_by_gravity_each_frame() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new();
        let mut motor = MockMotor::default();
        let dt = 0.05;

        let mut previous = state.move_direction.y;
        for frame in 1..=10 {
            step(&controller, &mut state, &mut motor, PlayerInput::IDLE, f64::from(frame), dt);
            assert!(approx(state.move_direction.y, previous - 9.81 * dt));
            previous = state.move_direction.y;
        }
        assert_eq!(motor.moves.len(), 10);
    }

    #[test]
    fn double_jump_fires_once_per_airtime() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new();
        let mut motor = MockMotor {
            grounded: true,
            ..Default::default()
        };
        let dt = 0.02;

        step(&controller, &mut state, &mut motor, PlayerInput::IDLE, 0.0, dt);
        motor.grounded = false;

        let first = step(&controller, &mut state, &mut motor, PlayerInput::jump(), 0.5, dt);
        assert_eq!(first, Some(JumpKind::Double));
        assert!(approx(state.move_direction.y, 8.0 - 9.81 * dt));
        assert!(!state.double_jump_available);

        let before = state.move_direction.y;
        let second = step(&controller, &mut state, &mut motor, PlayerInput::jump(), 0.52, dt);
        assert_eq!(second, None);
        assert!(approx(state.move_direction.y, before - 9.81 * dt));
    }

    #[test]
    fn double_jump_recharges_on_landing() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new();
        let mut motor = MockMotor::default();

        let without_ground = step(&controller, &mut state, &mut motor, PlayerInput::jump(), 1.0, 0.02);
        assert_eq!(without_ground, None);

        motor.grounded = true;
        step(&controller, &mut state, &mut motor, PlayerInput::IDLE, 1.02, 0.02);
        motor.grounded = false;

        let jump = step(&controller, &mut state, &mut motor, PlayerInput::jump(), 2.0, 0.02);
        assert_eq!(jump, Some(JumpKind::Double));
    }

    #[test]
    fn lenient_jump_keeps_double_jump() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new();
        let mut motor = MockMotor {
            grounded: true,
            ..Default::default()
        };
        let dt = 0.02;

        step(&controller, &mut state, &mut motor, PlayerInput::IDLE, 0.0, dt);
        motor.grounded = false;

        let lenient = step(&controller, &mut state, &mut motor, PlayerInput::jump(), 0.05, dt);
        assert_eq!(lenient, Some(JumpKind::Lenient));
        assert!(approx(state.move_direction.y, 8.0 - 9.81 * dt));
        assert!(state.double_jump_available);

        let double = step(&controller, &mut state, &mut motor, PlayerInput::jump(), 0.5, dt);
        assert_eq!(double, Some(JumpKind::Double));
    }

    #[test]
    fn leniency_expires() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new();
        let mut motor = MockMotor {
            grounded: true,
            ..Default::default()
        };

        step(&controller, &mut state, &mut motor, PlayerInput::IDLE, 0.0, 0.02);
        motor.grounded = false;

        let jump = step(&controller, &mut state, &mut motor, PlayerInput::jump(), 0.11, 0.02);
        assert_eq!(jump, Some(JumpKind::Double));
    }

    #[test]
    fn leniency_window_holds_after_days_of_uptime() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new();
        let mut motor = MockMotor {
            grounded: true,
            ..Default::default()
        };
        let dt = 1.0 / 60.0;
        let mut now = 600_000.0;

        step(&controller, &mut state, &mut motor, PlayerInput::IDLE, now, dt);
        motor.grounded = false;

        let mut kinds = Vec::new();
        for _ in 0..120 {
            now += f64::from(dt);
            if let Some(kind) = step(&controller, &mut state, &mut motor, PlayerInput::jump(), now, dt) {
                kinds.push(kind);
            }
        }

        let lenient = kinds.iter().filter(|k| **k == JumpKind::Lenient).count();
        assert!((5..=6).contains(&lenient), "lenient jumps: {lenient}");
        assert_eq!(kinds.len(), lenient + 1);
        assert_eq!(kinds.last(), Some(&JumpKind::Double));
    }

    #[test]
    fn movement_follows_facing() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new();
        let mut motor = MockMotor {
            grounded: true,
            ..Default::default()
        };
        let facing_right = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);

        controller.resolve_movement(
            &mut state,
            &PlayerInput::movement(0.0, 1.0),
            FrameTime::new(0.02, 0.0),
            &mut motor,
            facing_right,
        );

        assert!(approx(state.move_direction.x, 2.0));
        assert!(approx(state.move_direction.z, 0.0));
    }

    #[test]
    fn airborne_keeps_horizontal_control() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new();
        state.move_direction = Vec3::new(0.0, 3.0, 0.0);
        let mut motor = MockMotor::default();

        step(&controller, &mut state, &mut motor, PlayerInput::movement(1.0, -1.0), 5.0, 0.1);

        assert!(approx(state.move_direction.x, 2.0));
        assert!(approx(state.move_direction.z, -2.0));
        assert!(approx(state.move_direction.y, 3.0 - 0.981));
    }

    #[test]
    fn rotation_adds_scaled_yaw() {
        let controller = PlayerController::default();
        let mut orientation = Quat::IDENTITY;

        controller.resolve_rotation(&mut orientation, 1.0, 1.0);

        assert!((yaw_degrees(orientation) - 60.0).abs() < 1e-3);
    }

    #[test]
    fn rotation_wraps_past_full_turn() {
        let controller = PlayerController::default();
        let mut orientation = Quat::from_rotation_y(330_f32.to_radians());

        controller.resolve_rotation(&mut orientation, 1.0, 1.0);

        assert!((yaw_degrees(orientation) - 30.0).abs() < 1e-3);
    }

    #[test]
    fn rotation_keeps_pitch() {
        let controller = PlayerController::default();
        let mut orientation = Quat::from_euler(EulerRot::YXZ, 0.0, 0.3, 0.0);

        controller.resolve_rotation(&mut orientation, -0.5, 1.0);

        let (yaw, pitch, _) = orientation.to_euler(EulerRot::YXZ);
        assert!(approx(pitch, 0.3));
        assert!(approx(yaw, (-30_f32).to_radians()));
    }

    #[test]
    fn dead_player_skips_movement_and_rotation() {
        let controller = PlayerController::default();
        let mut world = World::new();
        let weapon = world.spawn(EntityType::Prop);
        let gate = LifeGate::new(vec![weapon]);
        let mut health = Health::new(10.0);
        health.damage(10.0);

        let mut state = PlayerState::new();
        let mut motor = MockMotor {
            grounded: true,
            ..Default::default()
        };
        let mut orientation = Quat::IDENTITY;
        let input = PlayerInput {
            vertical: 1.0,
            look_horizontal: 1.0,
            jump_pressed: true,
            ..PlayerInput::IDLE
        };

        let report = controller.update(
            &mut state,
            &input,
            FrameTime::new(0.1, 0.0),
            PlayerRig {
                motor: &mut motor,
                orientation: &mut orientation,
                health: &health,
                gate: &gate,
                dependents: &mut world,
            },
        );

        assert_eq!(report.life, LifeState::Dead);
        assert!(motor.moves.is_empty());
        assert_eq!(orientation, Quat::IDENTITY);
        assert!(!world.is_active(weapon));
        assert!(!state.alive);

        health.restore();
        let report = controller.update(
            &mut state,
            &input,
            FrameTime::new(0.1, 0.1),
            PlayerRig {
                motor: &mut motor,
                orientation: &mut orientation,
                health: &health,
                gate: &gate,
                dependents: &mut world,
            },
        );

        assert_eq!(report.life, LifeState::Alive);
        assert_eq!(report.jump, Some(JumpKind::Ground));
        assert_eq!(motor.moves.len(), 1);
        assert!(world.is_active(weapon));
        assert!((report.yaw_degrees - 6.0).abs() < 1e-3);
    }
}
