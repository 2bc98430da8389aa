mod character;
mod motor;
mod world;

pub use character::{BoundCharacter, CharacterShape, KinematicCharacter};
pub use motor::CharacterMotor;
pub use world::PhysicsWorld;
