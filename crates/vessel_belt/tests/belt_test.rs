//! # Belt Integration Tests
//!
//! A revolver cylinder and a magazine handing rounds to each other.

use vessel_belt::{move_one_item, Belt, Drum, MoveOutcome, Queue, Slot};

const CAPACITY: usize = 6;
const INCENDIARY: &str = "Incendiary";
const EXPANSIVE: &str = "Expansive";

trait Ammo {
    fn kind(&self) -> &'static str;
}

/// Ignites on contact.
struct Incendiary;

impl Ammo for Incendiary {
    fn kind(&self) -> &'static str {
        INCENDIARY
    }
}

/// Does more damage.
struct Expansive;

impl Ammo for Expansive {
    fn kind(&self) -> &'static str {
        EXPANSIVE
    }
}

static INCENDIARY_ROUND: Incendiary = Incendiary;
static EXPANSIVE_ROUND: Expansive = Expansive;

fn incendiary() -> Slot<'static, dyn Ammo> {
    Some(&INCENDIARY_ROUND)
}

fn expansive() -> Slot<'static, dyn Ammo> {
    Some(&EXPANSIVE_ROUND)
}

/// Slot kinds starting at the feeder, `None` for empty slots.
fn kinds<'a, B: Belt<'a, dyn Ammo> + ?Sized>(belt: &B) -> Vec<Option<&'static str>> {
    belt.slot_items().iter().map(|slot| slot.map(Ammo::kind)).collect()
}

fn occupied<'a, B: Belt<'a, dyn Ammo> + ?Sized>(belt: &B) -> Vec<usize> {
    kinds(belt)
        .iter()
        .enumerate()
        .filter_map(|(offset, kind)| kind.map(|_| offset))
        .collect()
}

#[test]
fn test_new_belts_are_empty() {
    let drum: Drum<'_, dyn Ammo> = Drum::new(CAPACITY);
    let queue: Queue<'_, dyn Ammo> = Queue::new(CAPACITY);

    assert!(occupied(&drum).is_empty());
    assert_eq!((drum.item_count(), drum.slot_capacity()), (0, CAPACITY));
    assert!(occupied(&queue).is_empty());
    assert_eq!((queue.item_count(), queue.slot_capacity()), (0, CAPACITY));
}

#[test]
fn test_drum_turns() {
    let mut drum: Drum<'_, dyn Ammo> = Drum::new(CAPACITY);

    drum.exchange_feeder_slot(incendiary());
    assert_eq!(occupied(&drum), vec![0]);

    drum.advance(1);
    assert_eq!(occupied(&drum), vec![5]);
    assert_eq!(kinds(&drum)[5], Some(INCENDIARY));

    drum.exchange_feeder_slot(expansive());
    assert_eq!(occupied(&drum), vec![0, 5]);

    drum.advance(1);
    assert_eq!(
        kinds(&drum),
        vec![None, None, None, None, Some(INCENDIARY), Some(EXPANSIVE)]
    );

    while drum.is_empty_at(0) {
        drum.advance(1);
    }
    assert_eq!(occupied(&drum), vec![0, 1]);

    while !drum.is_empty_at(0) {
        drum.advance(1);
    }
    assert_eq!(occupied(&drum), vec![4, 5]);

    drum.exchange_feeder_slot(incendiary());
    drum.advance(2);
    assert_eq!(
        kinds(&drum),
        vec![None, None, Some(INCENDIARY), Some(EXPANSIVE), Some(INCENDIARY), None]
    );

    // Receiver pushes into empty slots turn the drum.
    drum.exchange_receiver_slot(expansive());
    assert_eq!(occupied(&drum), vec![1, 2, 3, 4]);
    drum.exchange_receiver_slot(expansive());
    assert_eq!(drum.item_count(), CAPACITY - 1);
    drum.exchange_receiver_slot(expansive());
    assert_eq!(
        kinds(&drum),
        vec![
            Some(EXPANSIVE),
            Some(INCENDIARY),
            Some(EXPANSIVE),
            Some(EXPANSIVE),
            Some(EXPANSIVE),
            Some(INCENDIARY),
        ]
    );

    // Full: the receiver swaps and hands the old round back.
    let returned = drum.exchange_receiver_slot(expansive());
    assert_eq!(returned.map(Ammo::kind), Some(INCENDIARY));
    assert_eq!(drum.item_count(), CAPACITY);
    assert_eq!(kinds(&drum)[5], Some(EXPANSIVE));
}

#[test]
fn test_queue_overflow() {
    let mut queue: Queue<'_, dyn Ammo> = Queue::new(CAPACITY);

    queue.exchange_feeder_slot(incendiary());
    queue.exchange_feeder_slot(expansive());
    queue.exchange_receiver_slot(expansive());
    assert_eq!(
        kinds(&queue),
        vec![Some(EXPANSIVE), Some(INCENDIARY), Some(EXPANSIVE), None, None, None]
    );

    let free = queue.slot_capacity() - queue.item_count();
    let returned = (0..CAPACITY)
        .filter(|_| queue.exchange_receiver_slot(incendiary()).is_some())
        .count();

    assert_eq!(returned, CAPACITY - free);
    assert_eq!(queue.item_count(), CAPACITY);
    assert_eq!(
        kinds(&queue),
        vec![
            Some(EXPANSIVE),
            Some(INCENDIARY),
            Some(EXPANSIVE),
            Some(INCENDIARY),
            Some(INCENDIARY),
            Some(INCENDIARY),
        ]
    );
}

#[test]
fn test_queue_never_exceeds_capacity() {
    let mut queue: Queue<'_, dyn Ammo> = Queue::new(3);
    for round in 0..20 {
        let item = if round % 2 == 0 { incendiary() } else { expansive() };
        if round % 3 == 0 {
            queue.exchange_feeder_slot(item);
        } else {
            queue.exchange_receiver_slot(item);
        }
        assert!(queue.item_count() <= queue.slot_capacity());
        assert!(queue.len() <= queue.slot_capacity());
    }
}

#[test]
fn test_fill_drum_from_magazine() {
    let mut magazine: Queue<'_, dyn Ammo> = Queue::new(CAPACITY);
    let mut drum: Drum<'_, dyn Ammo> = Drum::new(CAPACITY);
    for _ in 0..CAPACITY {
        magazine.exchange_receiver_slot(incendiary());
    }
    assert_eq!(magazine.item_count(), CAPACITY);

    while drum.item_count() < drum.slot_capacity() {
        assert_eq!(drum.take_one_from(&mut magazine), MoveOutcome::Moved);
    }

    assert_eq!(magazine.item_count(), 0);
    assert!(drum.is_full());
    assert_eq!(kinds(&drum), vec![Some(INCENDIARY); CAPACITY]);
}

#[test]
fn test_unload_drum_into_magazine() {
    let mut drum: Drum<'_, dyn Ammo> = Drum::new(CAPACITY);
    drum.set_slot_items(vec![incendiary(), None, expansive(), None, incendiary()]);
    let mut magazine: Queue<'_, dyn Ammo> = Queue::new(CAPACITY);

    let mut outcomes = Vec::new();
    loop {
        let outcome = move_one_item(&mut magazine, &mut drum);
        if outcome == MoveOutcome::Idle {
            break;
        }
        outcomes.push(outcome);
    }

    assert_eq!(outcomes, vec![MoveOutcome::Moved; 3]);
    assert_eq!(
        kinds(&magazine),
        vec![Some(INCENDIARY), Some(EXPANSIVE), Some(INCENDIARY), None, None, None]
    );
}

#[test]
fn test_move_into_full_receiver_loses_item() {
    let mut feeder: Drum<'_, dyn Ammo> = Drum::new(CAPACITY);
    feeder.exchange_feeder_slot(expansive());
    let mut receiver: Queue<'_, dyn Ammo> = Queue::new(2);
    receiver.set_slot_items(vec![incendiary(), incendiary()]);

    assert_eq!(move_one_item(&mut receiver, &mut feeder), MoveOutcome::Dropped);
    assert_eq!(feeder.item_count(), 0);
    assert_eq!(kinds(&receiver), vec![Some(INCENDIARY), Some(INCENDIARY)]);
}

#[test]
fn test_full_turn_restores_drum() {
    let mut drum: Drum<'_, dyn Ammo> = Drum::new(CAPACITY);
    drum.set_slot_items(vec![incendiary(), None, expansive()]);
    let before = kinds(&drum);

    for _ in 0..CAPACITY {
        drum.advance(1);
    }
    assert_eq!(kinds(&drum), before);
}
