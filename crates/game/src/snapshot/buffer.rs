use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::EntityHandle;

/// Per-tick record of a player's resolved movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub tick: u32,
    pub entity: EntityHandle,
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw_degrees: f32,
    pub grounded: bool,
    pub alive: bool,
}

#[derive(Debug)]
pub struct SnapshotBuffer {
    snapshots: Vec<Option<PlayerSnapshot>>,
    capacity: usize,
}

impl SnapshotBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: (0..capacity).map(|_| None).collect(),
            capacity,
        }
    }

    pub fn push(&mut self, snapshot: PlayerSnapshot) {
        let index = (snapshot.tick as usize) % self.capacity;
        self.snapshots[index] = Some(snapshot);
    }

    pub fn get(&self, tick: u32) -> Option<&PlayerSnapshot> {
        let index = (tick as usize) % self.capacity;
        self.snapshots[index].as_ref().filter(|s| s.tick == tick)
    }

    pub fn latest(&self) -> Option<&PlayerSnapshot> {
        self.snapshots
            .iter()
            .filter_map(|s| s.as_ref())
            .max_by_key(|s| s.tick)
    }

    /// Stored snapshots, oldest first.
    pub fn ordered(&self) -> Vec<&PlayerSnapshot> {
        let mut snapshots: Vec<&PlayerSnapshot> =
            self.snapshots.iter().filter_map(|s| s.as_ref()).collect();
        snapshots.sort_by_key(|s| s.tick);
        snapshots
    }

    pub fn clear(&mut self) {
        for slot in &mut self.snapshots {
            *slot = None;
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
