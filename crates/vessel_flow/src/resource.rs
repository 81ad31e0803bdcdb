//! # One-Shot Resources
//!
//! A [`Resource`] is a throwaway source holding a fixed packet. It is the
//! named replacement for literal constructors:
//!
//! ```rust
//! vessel_flow::resource_model! {
//!     pub struct Tank;
//!     units = f32;
//!     pub enum TankResource { Fuel, Oxygen }
//! }
//!
//! use std::sync::Arc;
//! use vessel_flow::{make_resource, CapacityTable, Sink, Store};
//!
//! let table = Arc::new(CapacityTable::<Tank>::new().with(TankResource::Fuel, 100.0));
//! let mut tank = Store::new(table);
//! tank.receive_from(&mut make_resource(TankResource::Fuel, 40.0));
//! assert_eq!(tank.available(TankResource::Fuel), 40.0);
//! ```

use crate::exchange::{ExchangeToken, Source};
use crate::model::ResourceModel;
use crate::packet::Packet;
use crate::units::Units;

/// A fixed bundle of amounts usable as a source.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<M: ResourceModel> {
    remaining: Packet<M>,
}

impl<M: ResourceModel> Resource<M> {
    /// Wraps a packet. Negative entries become zero.
    #[must_use]
    pub fn from_packet(packet: &Packet<M>) -> Self {
        Self {
            remaining: packet.iter().map(|(id, amount)| (id, amount.max_zero())).collect(),
        }
    }

    /// Builder form: adds another entry.
    #[must_use]
    pub fn and(mut self, id: M::Id, amount: M::Units) -> Self {
        self.remaining.insert(id, amount.max_zero());
        self
    }

    /// What has not been handed out yet.
    #[must_use]
    pub fn remaining(&self) -> &Packet<M> {
        &self.remaining
    }

    /// Returns true once everything was handed out.
    #[must_use]
    pub fn is_spent(&self) -> bool {
        self.remaining.is_negligible()
    }
}

impl<M: ResourceModel> Source<M> for Resource<M> {
    fn available_amounts(&self) -> Packet<M> {
        self.remaining.clone()
    }

    fn decrease_amounts(&mut self, packet: &Packet<M>, _token: ExchangeToken) {
        for (id, amount) in packet.iter() {
            if let Some(current) = self.remaining.get(id) {
                self.remaining.insert(id, current.sub_floored(amount));
            }
        }
    }
}

/// Creates a one-entry [`Resource`].
#[must_use]
pub fn make_resource<M: ResourceModel>(id: M::Id, amount: M::Units) -> Resource<M> {
    Resource {
        remaining: Packet::single(id, amount.max_zero()),
    }
}
