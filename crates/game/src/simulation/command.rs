use std::collections::VecDeque;

use crate::player::PlayerInput;
use crate::snapshot::EntityHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingInput {
    pub player: EntityHandle,
    pub tick: u32,
    pub input: PlayerInput,
}

/// Inputs queued ahead of the tick that consumes them, oldest first.
pub struct InputBuffer {
    inputs: VecDeque<PendingInput>,
    max_size: usize,
}

impl InputBuffer {
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            inputs: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Queues `input`, returning the oldest entry if the buffer had to drop it.
    pub fn push(
        &mut self,
        player: EntityHandle,
        tick: u32,
        input: PlayerInput,
    ) -> Option<PendingInput> {
        let evicted = if self.inputs.len() >= self.max_size {
            self.inputs.pop_front()
        } else {
            None
        };
        if let Some(dropped) = &evicted {
            log::warn!(
                "Input buffer full ({}), dropped input for {:?} at tick {}",
                self.max_size,
                dropped.player,
                dropped.tick
            );
        }
        self.inputs.push_back(PendingInput {
            player,
            tick,
            input,
        });
        evicted
    }

    /// Removes every input scheduled at or before `tick`.
    pub fn drain_for_tick(&mut self, tick: u32) -> Vec<PendingInput> {
        let mut result = Vec::new();
        let mut i = 0;
        while i < self.inputs.len() {
            if self.inputs[i].tick <= tick {
                if let Some(input) = self.inputs.remove(i) {
                    result.push(input);
                }
            } else {
                i += 1;
            }
        }
        result
    }

    pub fn discard_player(&mut self, player: EntityHandle) {
        self.inputs.retain(|p| p.player != player);
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Folds a tick's inputs for one player into a single frame of input.
///
/// The last axis values win; a jump press anywhere in the batch is kept so an
/// edge is never lost when several inputs land on the same tick.
pub fn merge_inputs<'a>(inputs: impl IntoIterator<Item = &'a PlayerInput>) -> Option<PlayerInput> {
    inputs.into_iter().fold(None, |merged: Option<PlayerInput>, next| {
        Some(match merged {
            Some(prev) => PlayerInput {
                jump_pressed: prev.jump_pressed || next.jump_pressed,
                ..*next
            },
            None => *next,
        })
    })
}
