use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, require_positive};
use crate::physics::CharacterShape;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_rate: u32,
    pub input_buffer_size: usize,
    pub event_capacity: usize,
    pub history_capacity: usize,
    pub player_radius: f32,
    pub player_height: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            input_buffer_size: 256,
            event_capacity: 256,
            history_capacity: 128,
            player_radius: 0.4,
            player_height: 1.8,
        }
    }
}

impl SimulationConfig {
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    pub fn character_shape(&self) -> CharacterShape {
        CharacterShape {
            radius: self.player_radius,
            height: self.player_height,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("tick_rate", self.tick_rate as f32)?;
        require_positive("player_radius", self.player_radius)?;
        require_positive("player_height", self.player_height)?;
        Ok(())
    }
}
