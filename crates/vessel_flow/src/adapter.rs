//! # Container Adapter
//!
//! Lets a single [`Container`] take part in multi-resource exchanges by
//! presenting it as a one-identifier store.

use crate::container::Container;
use crate::exchange::{ExchangeToken, Sink, Source, UnitSink, UnitSource};
use crate::model::ResourceModel;
use crate::packet::Packet;
use crate::store::ResourcePackage;
use crate::units::Units;

/// A container viewed as a store managing exactly one identifier.
#[derive(Debug)]
pub struct ContainerAdapter<'a, M: ResourceModel> {
    id: M::Id,
    container: &'a mut Container<M::Units>,
}

impl<'a, M: ResourceModel> ContainerAdapter<'a, M> {
    /// Binds `container` to `id`.
    pub fn new(id: M::Id, container: &'a mut Container<M::Units>) -> Self {
        Self { id, container }
    }

    /// The identifier the container stands for.
    #[must_use]
    pub fn id(&self) -> M::Id {
        self.id
    }

    /// The wrapped container.
    #[must_use]
    pub fn container(&self) -> &Container<M::Units> {
        self.container
    }
}

impl<M: ResourceModel> Source<M> for ContainerAdapter<'_, M> {
    fn available_amounts(&self) -> Packet<M> {
        Packet::single(self.id, self.container.available_units())
    }

    fn decrease_amounts(&mut self, packet: &Packet<M>, token: ExchangeToken) {
        if let Some(amount) = packet.get(self.id) {
            self.container.decrease_units(amount, token);
        }
    }
}

impl<M: ResourceModel> Sink<M> for ContainerAdapter<'_, M> {
    fn requested_amounts(&self) -> Packet<M> {
        Packet::single(self.id, self.container.requested_units())
    }

    fn increase_amounts(&mut self, packet: &Packet<M>, token: ExchangeToken) {
        if let Some(amount) = packet.get(self.id) {
            self.container.increase_units(amount, token);
        }
    }
}

impl<M: ResourceModel> ResourcePackage<M> for ContainerAdapter<'_, M> {
    fn managed_ids(&self) -> Vec<M::Id> {
        vec![self.id]
    }

    fn available_of(&self, id: M::Id) -> M::Units {
        if id == self.id {
            self.container.available_units()
        } else {
            M::Units::ZERO
        }
    }

    fn requested_of(&self, id: M::Id) -> M::Units {
        if id == self.id {
            self.container.requested_units()
        } else {
            M::Units::ZERO
        }
    }
}
