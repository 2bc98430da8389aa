use serde::{Deserialize, Serialize};

/// Input polled for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Strafe axis, right positive.
    pub horizontal: f32,
    /// Forward axis, forward positive.
    pub vertical: f32,
    /// Yaw axis, right positive.
    pub look_horizontal: f32,
    /// True only on the frame the jump button went down.
    pub jump_pressed: bool,
}

impl PlayerInput {
    pub const IDLE: Self = Self {
        horizontal: 0.0,
        vertical: 0.0,
        look_horizontal: 0.0,
        jump_pressed: false,
    };

    pub fn movement(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
            ..Self::IDLE
        }
    }

    pub fn look(look_horizontal: f32) -> Self {
        Self {
            look_horizontal,
            ..Self::IDLE
        }
    }

    pub fn jump() -> Self {
        Self {
            jump_pressed: true,
            ..Self::IDLE
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump_pressed = true;
        self
    }

    /// Replaces non-finite axes with zero so a bad device reading cannot poison the velocity.
    pub fn sanitized(self) -> Self {
        let clean = |axis: f32| if axis.is_finite() { axis } else { 0.0 };
        Self {
            horizontal: clean(self.horizontal),
            vertical: clean(self.vertical),
            look_horizontal: clean(self.look_horizontal),
            jump_pressed: self.jump_pressed,
        }
    }
}
