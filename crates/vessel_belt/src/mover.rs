//! # Belt-to-Belt Mover
//!
//! Moves one item from the feeder end of one belt to the receiver end of
//! another.
//!
//! The item is taken out of the feeder *before* the receiver is checked.
//! When the receiver is already full the item is dropped: it is gone from
//! the feeder and never reaches the receiver. [`move_one_item`] reports this
//! as [`MoveOutcome::Dropped`].

use crate::belt::{Belt, Slot};

/// What a call to [`move_one_item`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// The feeder was empty.
    Idle,
    /// One item moved.
    Moved,
    /// One item left the feeder but the receiver was full.
    Dropped,
}

/// Turns `feeder` to its first occupied slot and takes the item out.
///
/// Returns `None` if the feeder holds nothing.
pub fn pull_item<'a, T, F>(feeder: &mut F) -> Slot<'a, T>
where
    T: ?Sized,
    F: Belt<'a, T> + ?Sized,
{
    if feeder.item_count() == 0 {
        return None;
    }

    for _ in 0..feeder.slot_capacity() {
        if !feeder.is_empty_at(0) {
            break;
        }
        feeder.advance(1);
    }

    feeder.exchange_feeder_slot(None)
}

/// Turns `receiver` to an empty receiver slot and puts `item` there.
///
/// Returns `item` unchanged if the receiver is full.
pub fn push_item<'a, T, R>(receiver: &mut R, item: Slot<'a, T>) -> Slot<'a, T>
where
    T: ?Sized,
    R: Belt<'a, T> + ?Sized,
{
    if receiver.is_full() {
        return item;
    }

    for _ in 0..receiver.slot_capacity() {
        if receiver.is_empty_at(receiver.receiver_offset()) {
            break;
        }
        receiver.advance(1);
    }

    receiver.exchange_receiver_slot(item)
}

/// Moves one item from `feeder` into `receiver`.
pub fn move_one_item<'a, T, R, F>(receiver: &mut R, feeder: &mut F) -> MoveOutcome
where
    T: ?Sized + 'a,
    R: Belt<'a, T> + ?Sized,
    F: Belt<'a, T> + ?Sized,
{
    let item = pull_item(feeder);
    if item.is_none() {
        return MoveOutcome::Idle;
    }

    match push_item(receiver, item) {
        None => MoveOutcome::Moved,
        Some(_) => {
            tracing::warn!(
                capacity = receiver.slot_capacity(),
                "receiver belt full, item dropped"
            );
            MoveOutcome::Dropped
        }
    }
}
