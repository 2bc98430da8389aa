use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, require_finite, require_non_negative};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub move_speed: f32,
    /// Degrees per second at full look-axis deflection.
    pub look_speed: f32,
    pub jump_power: f32,
    pub gravity: f32,

    /// Seconds after leaving the ground during which a jump still counts as grounded.
    pub jump_time_leniency: f32,

    /// Vertical velocity held while grounded so the grounded check keeps reporting contact.
    pub ground_snap_velocity: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            look_speed: 60.0,
            jump_power: 8.0,
            gravity: 9.81,

            jump_time_leniency: 0.1,

            ground_snap_velocity: -0.3,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("move_speed", self.move_speed)?;
        require_finite("look_speed", self.look_speed)?;
        require_non_negative("jump_power", self.jump_power)?;
        require_non_negative("gravity", self.gravity)?;
        require_non_negative("jump_time_leniency", self.jump_time_leniency)?;
        require_finite("ground_snap_velocity", self.ground_snap_velocity)?;
        if self.ground_snap_velocity > 0.0 {
            return Err(ConfigError::Positive {
                field: "ground_snap_velocity",
                value: self.ground_snap_velocity,
            });
        }
        Ok(())
    }
}
