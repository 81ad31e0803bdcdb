//! # Queue
//!
//! A bounded double-ended belt. The feeder is the front, the receiver is
//! the back.
//!
//! Under capacity, items are pushed onto either end. At capacity, an
//! exchange swaps with the occupant of that end and hands it back; a front
//! slot emptied this way is removed.

use std::collections::VecDeque;

use crate::belt::{Belt, Slot};

/// Linear belt.
#[derive(Debug)]
pub struct Queue<'a, T: ?Sized> {
    slots: VecDeque<Slot<'a, T>>,
    capacity: usize,
}

impl<'a, T: ?Sized> Queue<'a, T> {
    /// Creates an empty queue. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of slots currently in the sequence, empty ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the sequence has no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn has_free_slots(&self) -> bool {
        self.slots.len() < self.capacity
    }
}

impl<'a, T: ?Sized> Belt<'a, T> for Queue<'a, T> {
    fn set_slot_items(&mut self, items: Vec<Slot<'a, T>>) {
        self.slots = items.into_iter().take(self.capacity).collect();
        while matches!(self.slots.back(), Some(None)) {
            self.slots.pop_back();
        }
        tracing::debug!(items = self.item_count(), "queue slots loaded");
    }

    fn exchange_feeder_slot(&mut self, item: Slot<'a, T>) -> Slot<'a, T> {
        if item.is_some() && self.has_free_slots() {
            self.slots.push_front(item);
            return None;
        }

        let Some(front) = self.slots.front_mut() else {
            return item;
        };
        let pulled = std::mem::replace(front, item);
        if front.is_none() {
            self.slots.pop_front();
        }
        pulled
    }

    fn exchange_receiver_slot(&mut self, item: Slot<'a, T>) -> Slot<'a, T> {
        if item.is_some() && self.has_free_slots() {
            self.slots.push_back(item);
            return None;
        }

        match self.slots.back_mut() {
            Some(back) => std::mem::replace(back, item),
            None => item,
        }
    }

    /// Rotates the sequence front to back.
    fn advance(&mut self, offset: usize) {
        if !self.slots.is_empty() {
            let steps = offset % self.slots.len();
            self.slots.rotate_left(steps);
        }
    }

    /// Positions past the end of the sequence read as empty.
    fn is_empty_at(&self, offset: usize) -> bool {
        self.slots
            .get(offset % self.capacity)
            .map_or(true, Option::is_none)
    }

    fn item_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn slot_capacity(&self) -> usize {
        self.capacity
    }

    fn receiver_offset(&self) -> usize {
        self.capacity - 1
    }

    fn slot_items(&self) -> Vec<Slot<'a, T>> {
        let mut items: Vec<Slot<'a, T>> = self.slots.iter().copied().collect();
        items.resize(self.capacity, None);
        items
    }
}
