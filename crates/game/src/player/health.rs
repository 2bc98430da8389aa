use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).clamp(0.0, self.max);
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).clamp(0.0, self.max);
    }

    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    pub fn restore(&mut self) {
        self.current = self.max;
    }
}
