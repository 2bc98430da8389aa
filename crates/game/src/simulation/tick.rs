use super::Simulation;

/// Timing for a single controller update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub dt: f32,
    /// Simulation time at the start of the frame.
    pub now: f64,
}

impl FrameTime {
    pub fn new(dt: f32, now: f64) -> Self {
        Self { dt, now }
    }
}

pub struct FixedTimestep {
    tick_rate: u32,
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            tick_rate,
            dt: 1.0 / tick_rate as f32,
            accumulator: 0.0,
        }
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn accumulate(&mut self, delta: f32) {
        self.accumulator += delta.clamp(0.0, 0.25);
    }

    pub fn should_tick(&self) -> bool {
        self.accumulator >= self.dt
    }

    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            true
        } else {
            false
        }
    }

}

/// Drives a [`Simulation`] from variable frame deltas. `input_fn` runs before
/// every fixed tick so callers can queue that tick's input.
pub struct SimulationLoop<F> {
    simulation: Simulation,
    timestep: FixedTimestep,
    input_fn: F,
}

impl<F> SimulationLoop<F>
where
    F: FnMut(&mut Simulation),
{
    pub fn new(simulation: Simulation, input_fn: F) -> Self {
        let timestep = FixedTimestep::new(simulation.config().tick_rate);
        Self {
            simulation,
            timestep,
            input_fn,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    pub fn into_simulation(self) -> Simulation {
        self.simulation
    }

    pub fn update(&mut self, delta: f32) -> u32 {
        self.timestep.accumulate(delta);

        let mut ticks_run = 0;
        while self.timestep.consume_tick() {
            (self.input_fn)(&mut self.simulation);
            self.simulation.tick();
            ticks_run += 1;
        }

        ticks_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ControllerConfig;
    use crate::simulation::SimulationConfig;

    #[test]
    fn fixed_timestep_accumulation() {
        let mut ts = FixedTimestep::new(60);

        ts.accumulate(1.0 / 30.0);
        assert!(ts.should_tick());
        assert!(ts.consume_tick());
        assert!(ts.consume_tick());
        assert!(!ts.consume_tick());
    }

    #[test]
    fn fixed_timestep_clamps_long_frames() {
        let mut ts = FixedTimestep::new(10);
        ts.accumulate(5.0);

        let mut ticks = 0;
        while ts.consume_tick() {
            ticks += 1;
        }
        assert_eq!(ticks, 2);
    }

    #[test]
    fn simulation_loop_ticks() {
        let simulation =
            Simulation::new(SimulationConfig::default(), ControllerConfig::default()).unwrap();
        let mut calls = 0u32;
        let mut sim = SimulationLoop::new(simulation, |_sim| {
            calls += 1;
        });

        assert_eq!(sim.update(1.0 / 30.0), 2);
        assert_eq!(sim.simulation().world().tick(), 2);
        drop(sim);
        assert_eq!(calls, 2);
    }
}
