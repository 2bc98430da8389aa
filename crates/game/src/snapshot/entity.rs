use glam::{Quat, Vec3};
use rapier3d::dynamics::RigidBodyHandle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EntityType {
    #[default]
    Player,
    /// Held equipment such as the player's shooter.
    Weapon,
    Prop,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub u32);

impl EntityHandle {
    pub fn id(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: u32,
    pub entity_type: EntityType,
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    pub physics_handle: Option<RigidBodyHandle>,
    pub active: bool,
    pub dirty: bool,
}

impl Entity {
    pub fn new(id: u32, entity_type: EntityType) -> Self {
        Self {
            id,
            entity_type,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            physics_handle: None,
            active: true,
            dirty: true,
        }
    }

    pub fn player(id: u32, spawn_position: Vec3) -> Self {
        Self {
            position: spawn_position,
            ..Self::new(id, EntityType::Player)
        }
    }

    pub fn handle(&self) -> EntityHandle {
        EntityHandle(self.id)
    }

    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            self.active = active;
            self.dirty = true;
        }
    }
}
