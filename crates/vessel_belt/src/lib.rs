//! # Vessel Belt
//!
//! Ordered hand-off of discrete items between bounded belts.
//!
//! ## Architecture Rules
//!
//! 1. **Belts never own items** - A slot holds an optional shared reference
//! 2. **Two ends** - Items leave through the feeder slot and enter through the receiver slot
//! 3. **No allocation after construction** - Except [`Queue`] growth up to its capacity
//!
//! ## Variants
//!
//! - [`Drum`]: fixed cyclic buffer with a cursor, turns itself like a revolver cylinder
//! - [`Queue`]: bounded double-ended sequence, a conveyor
//!
//! ## Example
//!
//! ```rust
//! use vessel_belt::{move_one_item, Belt, Drum, MoveOutcome, Queue};
//!
//! let round = "incendiary";
//! let mut magazine: Queue<'_, str> = Queue::new(6);
//! magazine.exchange_receiver_slot(Some(round));
//!
//! let mut cylinder: Drum<'_, str> = Drum::new(6);
//! assert_eq!(move_one_item(&mut cylinder, &mut magazine), MoveOutcome::Moved);
//! assert_eq!(cylinder.item_count(), 1);
//! assert_eq!(magazine.item_count(), 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod belt;
pub mod drum;
pub mod mover;
pub mod queue;

pub use belt::{Belt, Slot};
pub use drum::Drum;
pub use mover::{move_one_item, pull_item, push_item, MoveOutcome};
pub use queue::Queue;
