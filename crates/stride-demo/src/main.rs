mod config;
mod scenario;

use anyhow::{Context, Result};
use clap::Parser;

use config::DemoConfig;
use scenario::{Action, Script};
use stride::{
    ControllerError, EntityHandle, EntityType, JumpCourse, PlayerEvent, PlayerInput, Simulation,
    SimulationLoop, yaw_degrees,
};

#[derive(Parser)]
#[command(name = "stride-demo")]
#[command(about = "Runs the jump-course script against the player controller")]
struct Args {
    #[arg(short, long, default_value_t = 600)]
    ticks: u32,

    #[arg(long, default_value_t = 60)]
    tick_rate: u32,

    #[arg(long, help = "Horizontal speed in units per second")]
    move_speed: Option<f32>,

    #[arg(long, help = "Yaw speed in degrees per second")]
    look_speed: Option<f32>,

    #[arg(long)]
    jump_power: Option<f32>,

    #[arg(long)]
    gravity: Option<f32>,

    #[arg(long, help = "Grace period in seconds after leaving the ground")]
    leniency: Option<f32>,

    #[arg(long, default_value_t = 0, help = "Print the last N per-tick snapshots")]
    trace: usize,

    #[arg(long, help = "Print the resolved configuration and exit")]
    print_config: bool,
}

impl Args {
    fn into_config(self) -> DemoConfig {
        let mut config = DemoConfig {
            ticks: self.ticks,
            trace: self.trace,
            ..Default::default()
        };

        config.simulation.tick_rate = self.tick_rate;
        config.simulation.history_capacity = config.simulation.history_capacity.max(self.trace);

        let controller = &mut config.controller;
        if let Some(v) = self.move_speed {
            controller.move_speed = v;
        }
        if let Some(v) = self.look_speed {
            controller.look_speed = v;
        }
        if let Some(v) = self.jump_power {
            controller.jump_power = v;
        }
        if let Some(v) = self.gravity {
            controller.gravity = v;
        }
        if let Some(v) = self.leniency {
            controller.jump_time_leniency = v;
        }

        config
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let print_config = args.print_config;
    let config = args.into_config();
    config.validate().context("invalid configuration")?;

    if print_config {
        println!("{:#?}", config.simulation);
        println!("{:#?}", config.controller);
        return Ok(());
    }

    run(&config)
}

fn run(config: &DemoConfig) -> Result<()> {
    let mut simulation = Simulation::new(config.simulation.clone(), config.controller.clone())
        .context("invalid configuration")?;

    let course = JumpCourse::new();
    course.build(simulation.physics_mut());
    simulation.physics_mut().step();

    let player = simulation.spawn_player(course.ledge_spawn(config.simulation.player_height))?;
    let shooter = simulation.spawn_dependent(player, EntityType::Weapon)?;
    simulation.set_shooter(player, shooter)?;

    // Scripts are authored at 60 Hz; rescale cue ticks for other rates.
    let scale = config.simulation.tick_rate as f32 / 60.0;
    let cues = scenario::jump_course()
        .into_iter()
        .map(|mut c| {
            c.at = (c.at as f32 * scale).round() as u32;
            c
        })
        .collect();
    let mut script = Script::new(cues);
    let mut failure = None;

    let mut sim_loop = SimulationLoop::new(simulation, |sim| {
        let tick = sim.current_tick();
        let (input, actions) = script.frame(tick);

        if let Err(e) = apply_frame(sim, player, input, &actions) {
            if failure.is_none() {
                failure = Some(e);
            }
        }
    });

    let dt = sim_loop.simulation().config().dt();
    let mut counts = EventCounts::default();
    for _ in 0..config.ticks {
        sim_loop.update(dt);
        for pending in sim_loop.simulation_mut().drain_events() {
            log::info!("[tick {:>4}] {:?}", pending.tick, pending.event);
            counts.record(&pending.event);
        }
    }

    let simulation = sim_loop.into_simulation();
    if let Some(e) = failure {
        return Err(e).context("scripted input failed");
    }

    report(&simulation, player, &counts, config.trace)
}

fn apply_frame(
    sim: &mut Simulation,
    player: EntityHandle,
    input: PlayerInput,
    actions: &[Action],
) -> Result<(), ControllerError> {
    for action in actions {
        match action {
            Action::Damage(amount) => sim.health_mut(player)?.damage(*amount),
            Action::Restore => sim.health_mut(player)?.restore(),
            Action::Hold(_) | Action::Jump => {}
        }
    }
    sim.queue_input(player, input)
}

#[derive(Debug, Default)]
struct EventCounts {
    jumps: u32,
    landings: u32,
    deaths: u32,
    revivals: u32,
}

impl EventCounts {
    fn record(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::Jumped { .. } => self.jumps += 1,
            PlayerEvent::Landed { .. } => self.landings += 1,
            PlayerEvent::Died { .. } => self.deaths += 1,
            PlayerEvent::Revived { .. } => self.revivals += 1,
            _ => {}
        }
    }
}

fn report(
    simulation: &Simulation,
    player: EntityHandle,
    counts: &EventCounts,
    trace: usize,
) -> Result<()> {
    let entity = simulation
        .world()
        .get(player)
        .context("player entity disappeared")?;
    let slot = simulation.player(player).context("player was unbound")?;

    let ground = simulation
        .physics()
        .raycast(entity.position, glam::Vec3::NEG_Y, 100.0, entity.physics_handle)
        .map(|(_, distance)| distance);

    if trace > 0 {
        let history = slot.history().ordered();
        let start = history.len().saturating_sub(trace);
        for snapshot in &history[start..] {
            println!(
                "tick {:>4}  pos ({:>7.3}, {:>7.3}, {:>7.3})  vel_y {:>7.3}  yaw {:>6.1}  grounded {}",
                snapshot.tick,
                snapshot.position.x,
                snapshot.position.y,
                snapshot.position.z,
                snapshot.velocity.y,
                snapshot.yaw_degrees,
                snapshot.grounded,
            );
        }
    }

    println!("ticks run:     {}", simulation.current_tick());
    println!("position:      {:.3?}", entity.position);
    println!("yaw:           {:.1}", yaw_degrees(entity.orientation));
    println!("grounded:      {}", slot.is_grounded());
    if let Some(distance) = ground {
        println!("ground below:  {:.3}", distance);
    }
    println!("health:        {}/{}", slot.health().current(), slot.health().max());
    println!(
        "events:        {} jumps, {} landings, {} deaths, {} revivals",
        counts.jumps, counts.landings, counts.deaths, counts.revivals
    );

    Ok(())
}
