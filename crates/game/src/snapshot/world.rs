use std::collections::HashMap;

use glam::Vec3;

use crate::player::DependentSet;

use super::entity::{Entity, EntityHandle, EntityType};

#[derive(Debug)]
pub struct World {
    tick: u32,
    entities: HashMap<u32, Entity>,
    next_entity_id: u32,
    removed_entities: Vec<u32>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            tick: 0,
            entities: HashMap::new(),
            next_entity_id: 1,
            removed_entities: Vec::new(),
        }
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn advance_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.removed_entities.clear();
        for entity in self.entities.values_mut() {
            entity.dirty = false;
        }
    }

    pub fn spawn(&mut self, entity_type: EntityType) -> EntityHandle {
        let id = self.allocate_id();
        self.entities.insert(id, Entity::new(id, entity_type));
        EntityHandle(id)
    }

    pub fn spawn_player(&mut self, spawn_position: Vec3) -> EntityHandle {
        let id = self.allocate_id();
        self.entities.insert(id, Entity::player(id, spawn_position));
        EntityHandle(id)
    }

    pub fn despawn(&mut self, handle: EntityHandle) -> Option<Entity> {
        let entity = self.entities.remove(&handle.0);
        if entity.is_some() {
            self.removed_entities.push(handle.0);
        }
        entity
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(&handle.0)
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.entities.get_mut(&handle.0)
    }

    pub fn is_active(&self, handle: EntityHandle) -> bool {
        self.get(handle).is_some_and(|e| e.active)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn removed_entities(&self) -> &[u32] {
        &self.removed_entities
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_entity_id;
        self.next_entity_id = self.next_entity_id.wrapping_add(1);
        id
    }
}

impl DependentSet for World {
    fn set_active(&mut self, handle: EntityHandle, active: bool) -> bool {
        match self.get_mut(handle) {
            Some(entity) => {
                entity.set_active(active);
                true
            }
            None => false,
        }
    }
}
