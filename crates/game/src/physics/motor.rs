use glam::Vec3;

/// Collision-resolving mover for a single character.
///
/// `is_grounded` reports contact as of the last `move_by`, so a controller
/// reads it before issuing this frame's move.
pub trait CharacterMotor {
    fn is_grounded(&self) -> bool;
    fn move_by(&mut self, translation: Vec3);
}
