mod config;
mod controller;
mod gate;
mod health;
mod input;
mod state;

pub use config::ControllerConfig;
pub use controller::{FrameReport, JumpKind, PlayerController, PlayerRig, yaw_degrees};
pub use gate::{DependentSet, LifeGate, LifeState};
pub use health::Health;
pub use input::PlayerInput;
pub use state::PlayerState;
