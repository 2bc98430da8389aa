use crate::snapshot::EntityHandle;

use super::Health;

/// Anything that can switch dependent entities on and off.
pub trait DependentSet {
    /// Returns `false` when the handle does not resolve to a live entity.
    fn set_active(&mut self, handle: EntityHandle, active: bool) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    Alive,
    Dead,
}

impl LifeState {
    pub fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }
}

/// Ties the active state of a list of entities to the owner's health.
#[derive(Debug, Clone, Default)]
pub struct LifeGate {
    dependents: Vec<EntityHandle>,
}

impl LifeGate {
    pub fn new(dependents: Vec<EntityHandle>) -> Self {
        Self { dependents }
    }

    pub fn dependents(&self) -> &[EntityHandle] {
        &self.dependents
    }

    pub fn add_dependent(&mut self, handle: EntityHandle) {
        if !self.dependents.contains(&handle) {
            self.dependents.push(handle);
        }
    }

    pub fn remove_dependent(&mut self, handle: EntityHandle) {
        self.dependents.retain(|h| *h != handle);
    }

    /// Applies the health check to every dependent. Callers skip movement and
    /// rotation for the frame when this returns [`LifeState::Dead`].
    pub fn evaluate<D: DependentSet>(&self, health: &Health, dependents: &mut D) -> LifeState {
        let state = if health.is_depleted() {
            LifeState::Dead
        } else {
            LifeState::Alive
        };

        for &handle in &self.dependents {
            if !dependents.set_active(handle, state.is_alive()) {
                log::warn!("Dependent entity {} is missing", handle.id());
            }
        }

        state
    }
}
