use std::collections::HashMap;

use glam::Vec3;

use crate::error::ControllerError;
use crate::event::{EventQueue, PendingEvent, PlayerEvent};
use crate::physics::{KinematicCharacter, PhysicsWorld};
use crate::player::{
    ControllerConfig, FrameReport, Health, LifeGate, PlayerController, PlayerInput, PlayerRig,
    PlayerState,
};
use crate::snapshot::{EntityHandle, EntityType, PlayerSnapshot, SnapshotBuffer, World};

use super::command::{InputBuffer, merge_inputs};
use super::{FrameTime, SimulationConfig};

pub struct PlayerSlot {
    character: KinematicCharacter,
    state: PlayerState,
    health: Health,
    gate: LifeGate,
    shooter: Option<EntityHandle>,
    history: SnapshotBuffer,
}

impl PlayerSlot {
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn gate(&self) -> &LifeGate {
        &self.gate
    }

    pub fn shooter(&self) -> Option<EntityHandle> {
        self.shooter
    }

    pub fn history(&self) -> &SnapshotBuffer {
        &self.history
    }

    pub fn is_grounded(&self) -> bool {
        self.character.is_grounded()
    }
}

/// Owns the world, the physics scene and every bound player, and advances
/// them one fixed tick at a time.
pub struct Simulation {
    config: SimulationConfig,
    controller: PlayerController,
    world: World,
    physics: PhysicsWorld,
    players: HashMap<u32, PlayerSlot>,
    inputs: InputBuffer,
    events: EventQueue,
    elapsed: f64,
}

impl Simulation {
    pub fn new(
        config: SimulationConfig,
        controller_config: ControllerConfig,
    ) -> Result<Self, ControllerError> {
        config.validate()?;
        let controller = PlayerController::new(controller_config)?;

        Ok(Self {
            physics: PhysicsWorld::with_timestep(config.dt()),
            inputs: InputBuffer::new(config.input_buffer_size),
            events: EventQueue::new(config.event_capacity),
            controller,
            world: World::new(),
            players: HashMap::new(),
            elapsed: 0.0,
            config,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Level geometry goes in through here.
    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn current_tick(&self) -> u32 {
        self.world.tick()
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<PendingEvent> {
        self.events.drain()
    }

    pub fn player(&self, handle: EntityHandle) -> Option<&PlayerSlot> {
        self.players.get(&handle.id())
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn spawn_player(&mut self, position: Vec3) -> Result<EntityHandle, ControllerError> {
        let handle = self.world.spawn_player(position);
        let shape = self.config.character_shape();
        let body = self.physics.add_character(position, shape.radius, shape.height);

        if let Some(entity) = self.world.get_mut(handle) {
            entity.physics_handle = Some(body);
        }

        self.bind_player(handle)?;
        Ok(handle)
    }

    /// Attaches a controller to an entity that already carries a character body.
    pub fn bind_player(&mut self, handle: EntityHandle) -> Result<(), ControllerError> {
        let entity = self
            .world
            .get(handle)
            .ok_or(ControllerError::MissingEntity(handle))?;

        let Some(body) = entity
            .physics_handle
            .filter(|body| self.physics.contains_body(*body))
        else {
            log::error!("Entity {} has no character body attached", handle.id());
            return Err(ControllerError::MissingCharacterBody(handle));
        };

        let position = entity.position;
        let slot = PlayerSlot {
            character: KinematicCharacter::attach(body, self.config.character_shape()),
            state: PlayerState::new(),
            health: Health::default(),
            gate: LifeGate::default(),
            shooter: None,
            history: SnapshotBuffer::new(self.config.history_capacity),
        };
        self.players.insert(handle.id(), slot);

        log::info!("Player {} bound at {:?}", handle.id(), position);
        self.events.push(
            self.world.tick(),
            PlayerEvent::Spawned {
                player: handle,
                position: position.to_array(),
            },
        );
        Ok(())
    }

    pub fn despawn_player(&mut self, handle: EntityHandle) -> Result<(), ControllerError> {
        let slot = self
            .players
            .remove(&handle.id())
            .ok_or(ControllerError::UnknownPlayer(handle))?;

        self.physics.remove_body(slot.character.handle());
        self.world.despawn(handle);
        self.inputs.discard_player(handle);

        log::info!("Player {} despawned", handle.id());
        self.events
            .push(self.world.tick(), PlayerEvent::Despawned { player: handle });
        Ok(())
    }

    /// Spawns an entity whose active state follows the player's health.
    pub fn spawn_dependent(
        &mut self,
        player: EntityHandle,
        entity_type: EntityType,
    ) -> Result<EntityHandle, ControllerError> {
        if !self.players.contains_key(&player.id()) {
            return Err(ControllerError::UnknownPlayer(player));
        }
        let dependent = self.world.spawn(entity_type);
        self.add_dependent(player, dependent)?;
        Ok(dependent)
    }

    pub fn add_dependent(
        &mut self,
        player: EntityHandle,
        dependent: EntityHandle,
    ) -> Result<(), ControllerError> {
        if self.world.get(dependent).is_none() {
            return Err(ControllerError::MissingEntity(dependent));
        }
        self.slot_mut(player)?.gate.add_dependent(dependent);
        Ok(())
    }

    /// Records the player's shooter. A shooter that should hide on death must
    /// also be registered as a dependent.
    pub fn set_shooter(
        &mut self,
        player: EntityHandle,
        shooter: EntityHandle,
    ) -> Result<(), ControllerError> {
        if self.world.get(shooter).is_none() {
            return Err(ControllerError::MissingEntity(shooter));
        }
        self.slot_mut(player)?.shooter = Some(shooter);
        Ok(())
    }

    pub fn health_mut(&mut self, player: EntityHandle) -> Result<&mut Health, ControllerError> {
        Ok(&mut self.slot_mut(player)?.health)
    }

    /// Queues input for the next tick.
    pub fn queue_input(
        &mut self,
        player: EntityHandle,
        input: PlayerInput,
    ) -> Result<(), ControllerError> {
        let tick = self.world.tick();
        self.queue_input_at(player, tick, input)
    }

    pub fn queue_input_at(
        &mut self,
        player: EntityHandle,
        tick: u32,
        input: PlayerInput,
    ) -> Result<(), ControllerError> {
        if !self.players.contains_key(&player.id()) {
            return Err(ControllerError::UnknownPlayer(player));
        }
        self.inputs.push(player, tick, input);
        Ok(())
    }

    pub fn tick(&mut self) {
        let tick = self.world.tick();
        let frame = FrameTime::new(self.config.dt(), self.elapsed);

        let mut frame_inputs: HashMap<u32, Vec<PlayerInput>> = HashMap::new();
        for pending in self.inputs.drain_for_tick(tick) {
            frame_inputs
                .entry(pending.player.id())
                .or_default()
                .push(pending.input);
        }

        let mut ids: Vec<u32> = self.players.keys().copied().collect();
        ids.sort_unstable();

        for id in ids {
            let input = frame_inputs
                .get(&id)
                .and_then(|batch| merge_inputs(batch))
                .unwrap_or(PlayerInput::IDLE);
            self.update_player(EntityHandle(id), &input, frame, tick);
        }

        self.physics.step();
        self.world.advance_tick();
        self.elapsed += f64::from(frame.dt);
    }

    fn update_player(&mut self, handle: EntityHandle, input: &PlayerInput, frame: FrameTime, tick: u32) {
        let Some(slot) = self.players.get_mut(&handle.id()) else {
            return;
        };
        let Some(mut orientation) = self.world.get(handle).map(|e| e.orientation) else {
            log::warn!("Player entity {} is missing from the world", handle.id());
            return;
        };
        if !self.physics.contains_body(slot.character.handle()) {
            log::warn!("Player {} has lost its character body", handle.id());
            return;
        }

        let was_alive = slot.state.alive;
        let was_grounded = slot.state.grounded;
        let fall_speed = -slot.state.move_direction.y;

        let report = {
            let mut motor = slot.character.bind(&mut self.physics);
            self.controller.update(
                &mut slot.state,
                input,
                frame,
                PlayerRig {
                    motor: &mut motor,
                    orientation: &mut orientation,
                    health: &slot.health,
                    gate: &slot.gate,
                    dependents: &mut self.world,
                },
            )
        };

        let position = self
            .physics
            .body_position(slot.character.handle())
            .unwrap_or(Vec3::ZERO);
        if let Some(entity) = self.world.get_mut(handle) {
            entity.position = position;
            entity.orientation = orientation;
            entity.velocity = report.velocity;
            entity.dirty = true;
        }

        slot.history.push(PlayerSnapshot {
            tick,
            entity: handle,
            position,
            velocity: report.velocity,
            yaw_degrees: report.yaw_degrees,
            grounded: report.grounded,
            alive: report.life.is_alive(),
        });

        self.record_events(handle, tick, &report, was_alive, was_grounded, fall_speed);
    }

    fn record_events(
        &mut self,
        player: EntityHandle,
        tick: u32,
        report: &FrameReport,
        was_alive: bool,
        was_grounded: bool,
        fall_speed: f32,
    ) {
        match (was_alive, report.life.is_alive()) {
            (true, false) => {
                log::info!("Player {} died", player.id());
                self.events.push(tick, PlayerEvent::Died { player });
                return;
            }
            (false, true) => {
                log::info!("Player {} revived", player.id());
                self.events.push(tick, PlayerEvent::Revived { player });
            }
            (false, false) => return,
            (true, true) => {}
        }

        if report.grounded && !was_grounded {
            let impact_speed = fall_speed.max(0.0);
            log::debug!("Player {} landed at {:.2} m/s", player.id(), impact_speed);
            self.events
                .push(tick, PlayerEvent::Landed { player, impact_speed });
        } else if !report.grounded && was_grounded {
            self.events.push(tick, PlayerEvent::LeftGround { player });
        }

        if let Some(kind) = report.jump {
            log::debug!("Player {} jumped ({:?})", player.id(), kind);
            self.events.push(tick, PlayerEvent::Jumped { player, kind });
        }
    }

    fn slot_mut(&mut self, player: EntityHandle) -> Result<&mut PlayerSlot, ControllerError> {
        self.players
            .get_mut(&player.id())
            .ok_or(ControllerError::UnknownPlayer(player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation() -> Simulation {
        Simulation::new(SimulationConfig::default(), ControllerConfig::default()).unwrap()
    }

    #[test]
    fn rejects_invalid_controller_config() {
        let result = Simulation::new(
            SimulationConfig::default(),
            ControllerConfig {
                gravity: f32::NAN,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(ControllerError::InvalidConfig(_))));
    }

    #[test]
    fn binding_entity_without_body_fails() {
        let mut sim = simulation();
        let handle = sim.world.spawn_player(Vec3::ZERO);

        assert_eq!(
            sim.bind_player(handle),
            Err(ControllerError::MissingCharacterBody(handle))
        );
        assert_eq!(
            sim.bind_player(EntityHandle(99)),
            Err(ControllerError::MissingEntity(EntityHandle(99)))
        );
        assert_eq!(sim.player_count(), 0);
    }

    #[test]
    fn unknown_player_is_reported() {
        let mut sim = simulation();
        let ghost = EntityHandle(5);

        assert_eq!(
            sim.queue_input(ghost, PlayerInput::IDLE),
            Err(ControllerError::UnknownPlayer(ghost))
        );
        assert_eq!(sim.despawn_player(ghost), Err(ControllerError::UnknownPlayer(ghost)));
        assert!(sim.health_mut(ghost).is_err());
    }

    #[test]
    fn spawn_emits_event_and_body() {
        let mut sim = simulation();
        let player = sim.spawn_player(Vec3::new(0.0, 3.0, 0.0)).unwrap();

        let events = sim.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].event, PlayerEvent::Spawned { .. }));
        assert!(sim.world().get(player).unwrap().physics_handle.is_some());
    }

    #[test]
    fn death_hides_dependents_and_freezes_player() {
        let mut sim = simulation();
        let player = sim.spawn_player(Vec3::new(0.0, 5.0, 0.0)).unwrap();
        let shooter = sim.spawn_dependent(player, EntityType::Weapon).unwrap();
        sim.set_shooter(player, shooter).unwrap();
        sim.drain_events();

        sim.health_mut(player).unwrap().set(0.0);
        let before = sim.world().get(player).unwrap().position;
        sim.queue_input(player, PlayerInput::look(1.0)).unwrap();
        sim.tick();

        assert!(!sim.world().is_active(shooter));
        assert_eq!(sim.world().get(player).unwrap().position, before);
        assert_eq!(sim.world().get(player).unwrap().orientation, glam::Quat::IDENTITY);
        let events = sim.drain_events();
        assert!(events.iter().any(|e| e.event == PlayerEvent::Died { player }));

        sim.health_mut(player).unwrap().restore();
        sim.tick();

        assert!(sim.world().is_active(shooter));
        assert!(sim.world().get(player).unwrap().position.y < before.y);
        let events = sim.drain_events();
        assert!(events.iter().any(|e| e.event == PlayerEvent::Revived { player }));
        assert_eq!(sim.player(player).unwrap().shooter(), Some(shooter));
    }

    #[test]
    fn despawn_removes_everything() {
        let mut sim = simulation();
        let player = sim.spawn_player(Vec3::ZERO).unwrap();
        let body = sim.world().get(player).unwrap().physics_handle.unwrap();

        sim.despawn_player(player).unwrap();

        assert!(sim.player(player).is_none());
        assert!(sim.world().get(player).is_none());
        assert!(!sim.physics().contains_body(body));
    }

    #[test]
    fn elapsed_time_advances_per_tick() {
        let mut sim = simulation();
        for _ in 0..60 {
            sim.tick();
        }
        assert_eq!(sim.current_tick(), 60);
        assert!((sim.elapsed() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn clock_keeps_advancing_after_long_uptime() {
        let mut sim = simulation();
        sim.elapsed = 600_000.0;
        for _ in 0..60 {
            sim.tick();
        }
        assert!((sim.elapsed() - 600_001.0).abs() < 1e-6);
    }
}
