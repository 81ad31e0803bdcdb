//! # Resource Stores
//!
//! A bounded multi-resource collection keyed by identifier.
//!
//! ## Capacity Tables
//!
//! Capacities live in a [`CapacityTable`] owned outside the store and shared
//! through an `Arc`, so every store built from the same table sees the same
//! limits. An identifier missing from the table is *unmanaged*: it reads as
//! zero and writes to it are ignored.
//!
//! ## Layout
//!
//! Amounts live in the model's [`ResourceModel::Storage`], dense or sparse,
//! chosen at compile time. Both layouts are observably identical.
//!
//! ## Transfer, Not Copy
//!
//! A store is never duplicated. [`Store::stolen_from`] and
//! [`Store::steal_from`] run the exchange protocol with the other store as
//! the source, so total units are conserved.

use std::fmt;
use std::sync::Arc;

use crate::exchange::{
    exchange, ExchangeResult, ExchangeToken, Sink, Source, UnitSink, UnitSource,
};
use crate::layout::{AmountStorage, Layout};
use crate::model::{ResourceId, ResourceModel};
use crate::packet::{Packet, StateTable};
use crate::units::Units;

/// Shared identifier → capacity table.
///
/// Iteration order is insertion order; for tables loaded from configuration
/// it is identifier ordinal order.
pub struct CapacityTable<M: ResourceModel> {
    capacities: Packet<M>,
}

impl<M: ResourceModel> CapacityTable<M> {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            capacities: Packet::new(),
        }
    }

    /// Creates a table giving every identifier the same capacity.
    #[must_use]
    pub fn uniform(capacity: M::Units) -> Self {
        M::Id::all().map(|id| (id, capacity)).collect()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, id: M::Id, capacity: M::Units) -> Self {
        self.insert(id, capacity);
        self
    }

    /// Sets the capacity of `id`. Negative capacities become zero.
    pub fn insert(&mut self, id: M::Id, capacity: M::Units) {
        self.capacities.insert(id, capacity.max_zero());
    }

    /// Returns the capacity of `id` if managed.
    #[must_use]
    pub fn get(&self, id: M::Id) -> Option<M::Units> {
        self.capacities.get(id)
    }

    /// Returns true if `id` is managed.
    #[must_use]
    pub fn contains(&self, id: M::Id) -> bool {
        self.capacities.contains(id)
    }

    /// Iterates managed identifiers.
    pub fn ids(&self) -> impl Iterator<Item = M::Id> + '_ {
        self.capacities.ids()
    }

    /// Iterates `(identifier, capacity)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (M::Id, M::Units)> + '_ {
        self.capacities.iter()
    }

    /// Number of managed identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    /// Returns true if nothing is managed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }

    /// Wraps the table for sharing between stores.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl<M: ResourceModel> Default for CapacityTable<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ResourceModel> fmt::Debug for CapacityTable<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CapacityTable").field(&self.capacities).finish()
    }
}

impl<M: ResourceModel> FromIterator<(M::Id, M::Units)> for CapacityTable<M> {
    fn from_iter<T: IntoIterator<Item = (M::Id, M::Units)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (id, capacity) in iter {
            table.insert(id, capacity);
        }
        table
    }
}

/// Multi-resource store contract: a source and a sink over a known set of
/// identifiers.
pub trait ResourcePackage<M: ResourceModel>: Source<M> + Sink<M> {
    /// Identifiers this package manages.
    fn managed_ids(&self) -> Vec<M::Id>;

    /// Amount of `id` held, zero if unmanaged.
    fn available_of(&self, id: M::Id) -> M::Units;

    /// Room left for `id`, zero if unmanaged.
    fn requested_of(&self, id: M::Id) -> M::Units;
}

/// A bounded multi-resource store.
pub struct Store<M: ResourceModel> {
    capacities: Arc<CapacityTable<M>>,
    amounts: M::Storage,
}

impl<M: ResourceModel> Store<M> {
    /// Creates an empty store bound to `capacities`.
    #[must_use]
    pub fn new(capacities: Arc<CapacityTable<M>>) -> Self {
        Self {
            capacities,
            amounts: M::Storage::zeroed(),
        }
    }

    /// Creates a store on the same capacity table as `other` and moves as
    /// much of `other` into it as fits.
    #[must_use]
    pub fn stolen_from(other: &mut Self) -> Self {
        let mut store = Self::new(Arc::clone(&other.capacities));
        store.steal_from(other);
        store
    }

    /// Moves as much of `other` into this store as fits.
    pub fn steal_from(&mut self, other: &mut Self) -> ExchangeResult {
        exchange(other, self)
    }

    /// The shared capacity table.
    #[must_use]
    pub fn capacities(&self) -> &Arc<CapacityTable<M>> {
        &self.capacities
    }

    /// The storage layout selected for this model.
    #[must_use]
    pub const fn layout(&self) -> Layout {
        <M::Storage as AmountStorage<M::Id, M::Units>>::LAYOUT
    }

    /// Capacity of `id`, zero if unmanaged.
    #[must_use]
    pub fn capacity(&self, id: M::Id) -> M::Units {
        self.capacities.get(id).unwrap_or(M::Units::ZERO)
    }

    /// Amount of `id` held, zero if unmanaged.
    #[must_use]
    pub fn available(&self, id: M::Id) -> M::Units {
        if self.capacities.contains(id) {
            self.amounts.get(id)
        } else {
            M::Units::ZERO
        }
    }

    /// Room left for `id`: `capacity - amount`, zero if unmanaged.
    #[must_use]
    pub fn requested(&self, id: M::Id) -> M::Units {
        match self.capacities.get(id) {
            Some(capacity) => capacity.sub_floored(self.amounts.get(id)),
            None => M::Units::ZERO,
        }
    }

    /// Adds to `id`, clamped to its capacity. Called by the exchange engine only.
    pub fn increase(&mut self, id: M::Id, amount: M::Units, _token: ExchangeToken) {
        self.add(id, amount);
    }

    /// Removes from `id`, clamped at zero. Called by the exchange engine only.
    pub fn decrease(&mut self, id: M::Id, amount: M::Units, _token: ExchangeToken) {
        self.remove(id, amount);
    }

    /// Overwrites the amount of `id`, clamped to its capacity.
    pub(crate) fn set_amount(&mut self, id: M::Id, amount: M::Units) {
        if let Some(capacity) = self.capacities.get(id) {
            self.amounts.set(id, amount.clamp_to(capacity));
        }
    }

    /// Zeroes every amount.
    pub fn reset(&mut self) {
        self.amounts.clear();
        tracing::debug!(resources = self.capacities.len(), "store reset");
    }

    /// Returns true if every managed amount is negligible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capacities.ids().all(|id| self.amounts.get(id).is_negligible())
    }

    /// Sum of every managed amount, saturating.
    #[must_use]
    pub fn total_available(&self) -> M::Units {
        self.capacities
            .ids()
            .fold(M::Units::ZERO, |total, id| total.add_capped(self.amounts.get(id), M::Units::MAX))
    }

    /// Identifiers present in the capacity table.
    #[must_use]
    pub fn managed_ids(&self) -> Vec<M::Id> {
        self.capacities.ids().collect()
    }

    /// Restores amounts from a saved table.
    ///
    /// Every managed identifier is reset first; identifiers missing from
    /// `state` stay at zero, unmanaged entries are ignored.
    pub fn load_state(&mut self, state: &StateTable<M>) {
        self.amounts.clear();
        for (id, amount) in state.iter() {
            self.set_amount(id, amount);
        }
    }

    /// Records every managed amount.
    #[must_use]
    pub fn save_state(&self) -> StateTable<M> {
        self.capacities
            .ids()
            .map(|id| (id, self.amounts.get(id)))
            .collect()
    }

    /// A scalar source/sink view over one identifier.
    pub fn slot(&mut self, id: M::Id) -> StoreSlot<'_, M> {
        StoreSlot { store: self, id }
    }

    fn add(&mut self, id: M::Id, amount: M::Units) {
        if let Some(capacity) = self.capacities.get(id) {
            let current = self.amounts.get(id);
            self.amounts.set(id, current.add_capped(amount, capacity));
        }
    }

    fn remove(&mut self, id: M::Id, amount: M::Units) {
        if self.capacities.contains(id) {
            let current = self.amounts.get(id);
            self.amounts.set(id, current.sub_floored(amount));
        }
    }

    fn leftover(&self) -> Option<(M::Id, M::Units)> {
        self.capacities
            .ids()
            .map(|id| (id, self.amounts.get(id)))
            .find(|&(_, amount)| amount > M::Units::ZERO)
    }
}

impl<M: ResourceModel> Source<M> for Store<M> {
    fn available_amounts(&self) -> Packet<M> {
        self.capacities
            .ids()
            .map(|id| (id, self.amounts.get(id)))
            .collect()
    }

    fn decrease_amounts(&mut self, packet: &Packet<M>, _token: ExchangeToken) {
        for (id, amount) in packet.iter() {
            self.remove(id, amount);
        }
    }
}

impl<M: ResourceModel> Sink<M> for Store<M> {
    fn requested_amounts(&self) -> Packet<M> {
        self.capacities
            .iter()
            .map(|(id, capacity)| (id, capacity.sub_floored(self.amounts.get(id))))
            .collect()
    }

    fn increase_amounts(&mut self, packet: &Packet<M>, _token: ExchangeToken) {
        for (id, amount) in packet.iter() {
            self.add(id, amount);
        }
    }
}

impl<M: ResourceModel> ResourcePackage<M> for Store<M> {
    fn managed_ids(&self) -> Vec<M::Id> {
        Store::managed_ids(self)
    }

    fn available_of(&self, id: M::Id) -> M::Units {
        self.available(id)
    }

    fn requested_of(&self, id: M::Id) -> M::Units {
        self.requested(id)
    }
}

impl<M: ResourceModel> fmt::Debug for Store<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("layout", &self.layout())
            .field("amounts", &self.save_state())
            .finish()
    }
}

impl<M: ResourceModel> Drop for Store<M> {
    fn drop(&mut self) {
        if !M::CHECK_FLOW || !cfg!(debug_assertions) || std::thread::panicking() {
            return;
        }

        let leftover = self.leftover();
        if let Some((id, amount)) = leftover {
            tracing::error!(
                resource = id.name(),
                amount = ?amount,
                "store dropped with unconsumed resource"
            );
        }
        debug_assert!(
            leftover.is_none(),
            "store dropped with unconsumed resource: {leftover:?}"
        );
    }
}

/// Scalar view of one store entry, usable wherever a container is.
pub struct StoreSlot<'a, M: ResourceModel> {
    store: &'a mut Store<M>,
    id: M::Id,
}

impl<M: ResourceModel> StoreSlot<'_, M> {
    /// The identifier this view targets.
    #[must_use]
    pub fn id(&self) -> M::Id {
        self.id
    }
}

impl<M: ResourceModel> UnitSource for StoreSlot<'_, M> {
    type Units = M::Units;

    fn available_units(&self) -> M::Units {
        self.store.available(self.id)
    }

    fn decrease_units(&mut self, amount: M::Units, token: ExchangeToken) {
        self.store.decrease(self.id, amount, token);
    }
}

impl<M: ResourceModel> UnitSink for StoreSlot<'_, M> {
    type Units = M::Units;

    fn requested_units(&self) -> M::Units {
        self.store.requested(self.id)
    }

    fn increase_units(&mut self, amount: M::Units, token: ExchangeToken) {
        self.store.increase(self.id, amount, token);
    }
}
