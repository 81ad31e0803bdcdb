//! # Drum
//!
//! A fixed cyclic buffer with one cursor.
//!
//! ```text
//! feeder   = cursor
//! receiver = (cursor + receiver_offset) mod capacity
//! ```
//!
//! The drum turns by itself when an exchange completes cleanly at a boundary
//! slot: pulling an item out of the feeder, or pushing an item into an empty
//! receiver, advances the cursor by one.

use crate::belt::{Belt, Slot};

/// Rotating belt.
#[derive(Debug)]
pub struct Drum<'a, T: ?Sized> {
    slots: Vec<Slot<'a, T>>,
    cursor: usize,
    receiver_offset: usize,
}

impl<'a, T: ?Sized> Drum<'a, T> {
    /// Creates an empty drum whose receiver sits right behind the feeder.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self::with_receiver_offset(capacity, capacity - 1)
    }

    /// Creates an empty drum with an explicit receiver offset, clamped to
    /// `capacity - 1`.
    #[must_use]
    pub fn with_receiver_offset(capacity: usize, receiver_offset: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![None; capacity],
            cursor: 0,
            receiver_offset: receiver_offset.min(capacity - 1),
        }
    }

    #[inline]
    fn index(&self, offset: usize) -> usize {
        (self.cursor + offset % self.slots.len()) % self.slots.len()
    }

    fn exchange_at(&mut self, offset: usize, item: Slot<'a, T>) -> Slot<'a, T> {
        let index = self.index(offset);
        std::mem::replace(&mut self.slots[index], item)
    }
}

impl<'a, T: ?Sized> Belt<'a, T> for Drum<'a, T> {
    fn set_slot_items(&mut self, mut items: Vec<Slot<'a, T>>) {
        items.resize(self.slots.len(), None);
        self.slots = items;
        self.cursor = 0;
        tracing::debug!(items = self.item_count(), "drum slots loaded");
    }

    fn exchange_feeder_slot(&mut self, item: Slot<'a, T>) -> Slot<'a, T> {
        let push_empty = item.is_none();
        let pulled = self.exchange_at(0, item);
        if push_empty && pulled.is_some() {
            self.advance(1);
        }
        pulled
    }

    fn exchange_receiver_slot(&mut self, item: Slot<'a, T>) -> Slot<'a, T> {
        let push_filled = item.is_some();
        let pulled = self.exchange_at(self.receiver_offset, item);
        if push_filled && pulled.is_none() {
            self.advance(1);
        }
        pulled
    }

    fn advance(&mut self, offset: usize) {
        self.cursor = self.index(offset);
    }

    fn is_empty_at(&self, offset: usize) -> bool {
        self.slots[self.index(offset)].is_none()
    }

    fn item_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn slot_capacity(&self) -> usize {
        self.slots.len()
    }

    fn receiver_offset(&self) -> usize {
        self.receiver_offset
    }

    fn slot_items(&self) -> Vec<Slot<'a, T>> {
        (0..self.slots.len()).map(|offset| self.slots[self.index(offset)]).collect()
    }
}
