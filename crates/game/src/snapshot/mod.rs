mod buffer;
mod entity;
mod world;

pub use buffer::{PlayerSnapshot, SnapshotBuffer};
pub use entity::{Entity, EntityHandle, EntityType};
pub use world::World;
