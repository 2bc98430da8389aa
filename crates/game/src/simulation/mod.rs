mod command;
mod config;
mod state;
mod tick;

pub use command::{InputBuffer, PendingInput, merge_inputs};
pub use config::SimulationConfig;
pub use state::{PlayerSlot, Simulation};
pub use tick::{FixedTimestep, FrameTime, SimulationLoop};
