use std::collections::VecDeque;

use super::types::PlayerEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct PendingEvent {
    pub tick: u32,
    pub sequence: u32,
    pub event: PlayerEvent,
}

#[derive(Debug)]
pub struct EventQueue {
    pending: VecDeque<PendingEvent>,
    next_sequence: u32,
    max_pending: usize,
}

impl EventQueue {
    pub fn new(max_pending: usize) -> Self {
        let max_pending = max_pending.max(1);
        Self {
            pending: VecDeque::with_capacity(max_pending),
            next_sequence: 0,
            max_pending,
        }
    }

    pub fn push(&mut self, tick: u32, event: PlayerEvent) -> u32 {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);

        if self.pending.len() >= self.max_pending {
            self.evict_oldest();
        }

        self.pending.push_back(PendingEvent {
            tick,
            sequence,
            event,
        });

        sequence
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingEvent> {
        self.pending.iter()
    }

    pub fn drain(&mut self) -> Vec<PendingEvent> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    fn evict_oldest(&mut self) {
        let idx = self
            .pending
            .iter()
            .position(|e| e.event.is_transient())
            .unwrap_or(0);
        self.pending.remove(idx);
    }
}
