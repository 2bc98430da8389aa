use glam::Vec3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;

use super::world::capsule_half_segment;
use super::{CharacterMotor, PhysicsWorld};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterShape {
    pub radius: f32,
    pub height: f32,
}

impl Default for CharacterShape {
    fn default() -> Self {
        Self {
            radius: 0.4,
            height: 1.8,
        }
    }
}

/// Rapier-backed capsule that reports grounded contact from its last move.
pub struct KinematicCharacter {
    handle: RigidBodyHandle,
    controller: KinematicCharacterController,
    shape: SharedShape,
    grounded: bool,
}

impl KinematicCharacter {
    pub fn spawn(physics: &mut PhysicsWorld, position: Vec3, shape: CharacterShape) -> Self {
        let handle = physics.add_character(position, shape.radius, shape.height);
        Self::attach(handle, shape)
    }

    pub fn attach(handle: RigidBodyHandle, shape: CharacterShape) -> Self {
        let mut controller = KinematicCharacterController::default();
        controller.offset = CharacterLength::Absolute(0.02);
        controller.up = Vector::Y;
        controller.max_slope_climb_angle = 45_f32.to_radians();
        controller.min_slope_slide_angle = 35_f32.to_radians();
        controller.snap_to_ground = Some(CharacterLength::Absolute(0.2));
        controller.autostep = Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(0.3),
            min_width: CharacterLength::Absolute(0.15),
            include_dynamic_bodies: false,
        });

        Self {
            handle,
            controller,
            shape: SharedShape::capsule_y(capsule_half_segment(shape.radius, shape.height), shape.radius),
            grounded: false,
        }
    }

    pub fn handle(&self) -> RigidBodyHandle {
        self.handle
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn bind<'a>(&'a mut self, physics: &'a mut PhysicsWorld) -> BoundCharacter<'a> {
        BoundCharacter {
            character: self,
            physics,
        }
    }
}

/// A [`KinematicCharacter`] paired with the world it lives in for one frame.
pub struct BoundCharacter<'a> {
    character: &'a mut KinematicCharacter,
    physics: &'a mut PhysicsWorld,
}

impl BoundCharacter<'_> {
    pub fn position(&self) -> Option<Vec3> {
        self.physics.body_position(self.character.handle)
    }
}

impl CharacterMotor for BoundCharacter<'_> {
    fn is_grounded(&self) -> bool {
        self.character.grounded
    }

    fn move_by(&mut self, translation: Vec3) {
        let handle = self.character.handle;
        let Some(pose) = self.physics.body_pose(handle) else {
            log::warn!("Character body {:?} vanished before moving", handle);
            self.character.grounded = false;
            return;
        };

        let corrected = self.physics.move_character(
            &self.character.controller,
            handle,
            &self.character.shape,
            pose,
            Vector::new(translation.x, translation.y, translation.z),
        );

        let new_position = pose.translation + corrected.translation;
        self.physics
            .set_body_position(handle, Vec3::new(new_position.x, new_position.y, new_position.z));
        self.character.grounded = corrected.grounded;
    }
}
