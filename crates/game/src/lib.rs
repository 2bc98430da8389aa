pub mod error;
pub mod event;
pub mod map;
pub mod physics;
pub mod player;
pub mod simulation;
pub mod snapshot;

pub use error::{ConfigError, ControllerError};
pub use event::{EventQueue, PendingEvent, PlayerEvent};
pub use map::{JumpCourse, MapObject, MapObjectKind};
pub use physics::{BoundCharacter, CharacterMotor, CharacterShape, KinematicCharacter, PhysicsWorld};
pub use player::{
    ControllerConfig, DependentSet, FrameReport, Health, JumpKind, LifeGate, LifeState,
    PlayerController, PlayerInput, PlayerRig, PlayerState, yaw_degrees,
};
pub use simulation::{
    FixedTimestep, FrameTime, InputBuffer, PlayerSlot, Simulation, SimulationConfig,
    SimulationLoop,
};
pub use snapshot::{Entity, EntityHandle, EntityType, PlayerSnapshot, SnapshotBuffer, World};
