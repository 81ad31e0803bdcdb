//! # Belt Contract
//!
//! Shared surface of every slot belt. Offsets are relative to the feeder
//! slot: offset 0 is the feeder, [`Belt::receiver_offset`] is the receiver.

use crate::mover::{move_one_item, MoveOutcome};

/// An optional reference to an externally owned item.
pub type Slot<'a, T> = Option<&'a T>;

/// An ordered collection of item slots with a feeder end and a receiver end.
pub trait Belt<'a, T: ?Sized> {
    /// Replaces every slot, starting at the feeder.
    fn set_slot_items(&mut self, items: Vec<Slot<'a, T>>);

    /// Swaps `item` with the feeder slot and returns what was there.
    fn exchange_feeder_slot(&mut self, item: Slot<'a, T>) -> Slot<'a, T>;

    /// Swaps `item` with the receiver slot and returns what was there.
    fn exchange_receiver_slot(&mut self, item: Slot<'a, T>) -> Slot<'a, T>;

    /// Moves the belt forward by `offset` slots.
    fn advance(&mut self, offset: usize);

    /// Returns true if the slot at `offset` holds nothing.
    fn is_empty_at(&self, offset: usize) -> bool;

    /// Number of occupied slots.
    fn item_count(&self) -> usize;

    /// Number of slots.
    fn slot_capacity(&self) -> usize;

    /// Offset of the receiver slot from the feeder.
    fn receiver_offset(&self) -> usize;

    /// Every slot, starting at the feeder.
    fn slot_items(&self) -> Vec<Slot<'a, T>>;

    /// Returns true if every slot is occupied.
    fn is_full(&self) -> bool {
        self.item_count() == self.slot_capacity()
    }

    /// Moves one item from `feeder` into this belt, see [`move_one_item`].
    fn take_one_from<F>(&mut self, feeder: &mut F) -> MoveOutcome
    where
        Self: Sized,
        T: 'a,
        F: Belt<'a, T> + ?Sized,
    {
        move_one_item(self, feeder)
    }
}
