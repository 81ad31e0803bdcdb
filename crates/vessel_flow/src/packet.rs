//! # Packets
//!
//! An ordered identifier → amount mapping, the unit of multi-resource
//! negotiation. Entry order is insertion order and is observable: rate
//! limiters apportion bandwidth to earlier entries first.

use std::fmt;

use crate::model::ResourceModel;
use crate::units::Units;

/// Ordered identifier → amount mapping with unique identifiers.
pub struct Packet<M: ResourceModel> {
    entries: Vec<(M::Id, M::Units)>,
}

/// Flat identifier → amount record used by the persistence hooks.
pub type StateTable<M> = Packet<M>;

impl<M: ResourceModel> Packet<M> {
    /// Creates an empty packet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a packet holding one entry.
    #[must_use]
    pub fn single(id: M::Id, amount: M::Units) -> Self {
        Self {
            entries: vec![(id, amount)],
        }
    }

    /// Inserts or overwrites an entry. Overwriting keeps the original position.
    pub fn insert(&mut self, id: M::Id, amount: M::Units) {
        match self.entries.iter_mut().find(|(entry, _)| *entry == id) {
            Some((_, slot)) => *slot = amount,
            None => self.entries.push((id, amount)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, id: M::Id, amount: M::Units) -> Self {
        self.insert(id, amount);
        self
    }

    /// Returns the entry for `id`, if present.
    #[must_use]
    pub fn get(&self, id: M::Id) -> Option<M::Units> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|&(_, amount)| amount)
    }

    /// Returns the entry for `id`, or zero.
    #[must_use]
    pub fn amount(&self, id: M::Id) -> M::Units {
        self.get(id).unwrap_or(M::Units::ZERO)
    }

    /// Returns true if `id` has an entry.
    #[must_use]
    pub fn contains(&self, id: M::Id) -> bool {
        self.get(id).is_some()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (M::Id, M::Units)> + '_ {
        self.entries.iter().copied()
    }

    /// Iterates identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = M::Id> + '_ {
        self.entries.iter().map(|&(id, _)| id)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if every entry is at or below epsilon (or there are none).
    #[must_use]
    pub fn is_negligible(&self) -> bool {
        self.entries.iter().all(|&(_, amount)| amount.is_negligible())
    }
}

impl<M: ResourceModel> Default for Packet<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ResourceModel> Clone for Packet<M> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<M: ResourceModel> PartialEq for Packet<M> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<M: ResourceModel> fmt::Debug for Packet<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter().map(|(id, amount)| (id, amount))).finish()
    }
}

impl<M: ResourceModel> FromIterator<(M::Id, M::Units)> for Packet<M> {
    fn from_iter<T: IntoIterator<Item = (M::Id, M::Units)>>(iter: T) -> Self {
        let mut packet = Self::new();
        for (id, amount) in iter {
            packet.insert(id, amount);
        }
        packet
    }
}
