use stride::{ConfigError, ControllerConfig, SimulationConfig};

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub ticks: u32,
    pub trace: usize,
    pub simulation: SimulationConfig,
    pub controller: ControllerConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            trace: 0,
            simulation: SimulationConfig::default(),
            controller: ControllerConfig::default(),
        }
    }
}

impl DemoConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.controller.validate()
    }
}
