use glam::Vec3;

#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Velocity resolved last frame; `y` carries over while airborne.
    pub move_direction: Vec3,
    pub double_jump_available: bool,
    /// Simulation time after which an airborne jump no longer counts as grounded.
    pub lenient_until: f64,
    pub grounded: bool,
    pub alive: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            move_direction: Vec3::ZERO,
            double_jump_available: false,
            lenient_until: 0.0,
            grounded: false,
            alive: true,
        }
    }
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lenient(&self, now: f64) -> bool {
        now < self.lenient_until
    }

    pub fn consume_double_jump(&mut self) -> bool {
        std::mem::replace(&mut self.double_jump_available, false)
    }

    pub fn replenish(&mut self, now: f64, leniency: f32) {
        self.double_jump_available = true;
        self.lenient_until = now + f64::from(leniency);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_jump_is_consumed_once() {
        let mut state = PlayerState::new();
        state.replenish(0.0, 0.1);

        assert!(state.consume_double_jump());
        assert!(!state.consume_double_jump());
    }

    #[test]
    fn leniency_window_is_exclusive() {
        let mut state = PlayerState::new();
        state.replenish(1.0, 0.25);

        assert!(state.is_lenient(1.2));
        assert!(!state.is_lenient(1.25));
    }
}
