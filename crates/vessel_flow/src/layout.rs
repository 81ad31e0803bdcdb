//! # Store Layouts
//!
//! Two interchangeable amount storages behind [`AmountStorage`]:
//!
//! - [`DenseStorage`]: a fixed array indexed by identifier ordinal.
//! - [`SparseStorage`]: a hash map, absent entries read as zero.
//!
//! The choice is made once per resource model at compile time through
//! [`Select`] and [`LayoutFor`]; a store never branches on its layout at
//! runtime.

use std::collections::HashMap;
use std::fmt::Debug;
use std::marker::PhantomData;

use crate::model::ResourceId;
use crate::units::Units;

/// Byte budget for the dense layout: one cache line minus a pointer.
pub const DENSE_BUDGET_BYTES: usize = 64 - std::mem::size_of::<usize>();

/// Returns true if `count` amounts of `U` fit the dense budget.
#[must_use]
pub const fn prefers_dense<U>(count: usize) -> bool {
    count * std::mem::size_of::<U>() <= DENSE_BUDGET_BYTES
}

/// Which internal representation a storage uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Fixed array indexed by ordinal.
    Dense,
    /// Hash map keyed by identifier.
    Sparse,
}

/// Per-identifier amount storage.
///
/// Storages hold raw amounts only. Capacity clamping and the
/// unknown-identifier rules live in the store.
pub trait AmountStorage<Id, U>: Debug {
    /// The layout this storage implements.
    const LAYOUT: Layout;

    /// Creates storage with every amount at zero.
    fn zeroed() -> Self
    where
        Self: Sized;

    /// Reads an amount, zero if never written.
    fn get(&self, id: Id) -> U;

    /// Writes an amount.
    fn set(&mut self, id: Id, amount: U);

    /// Zeroes every amount.
    fn clear(&mut self);
}

/// Dense storage: `N` amounts indexed by ordinal.
#[derive(Clone, Debug)]
pub struct DenseStorage<Id, U, const N: usize> {
    amounts: [U; N],
    _ids: PhantomData<Id>,
}

impl<Id: ResourceId, U: Units, const N: usize> DenseStorage<Id, U, N> {
    /// Rejects, at compile time, an array length that does not match the
    /// identifier count.
    const MATCHES_IDS: () = assert!(N == Id::COUNT, "dense storage length must equal Id::COUNT");
}

impl<Id: ResourceId, U: Units, const N: usize> AmountStorage<Id, U> for DenseStorage<Id, U, N> {
    const LAYOUT: Layout = Layout::Dense;

    fn zeroed() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::MATCHES_IDS;
        Self {
            amounts: [U::ZERO; N],
            _ids: PhantomData,
        }
    }

    #[inline]
    fn get(&self, id: Id) -> U {
        self.amounts.get(id.ordinal()).copied().unwrap_or(U::ZERO)
    }

    #[inline]
    fn set(&mut self, id: Id, amount: U) {
        if let Some(slot) = self.amounts.get_mut(id.ordinal()) {
            *slot = amount;
        }
    }

    fn clear(&mut self) {
        self.amounts = [U::ZERO; N];
    }
}

/// Sparse storage: only non-zero amounts are kept.
#[derive(Clone, Debug)]
pub struct SparseStorage<Id, U> {
    amounts: HashMap<Id, U>,
}

impl<Id: ResourceId, U: Units> AmountStorage<Id, U> for SparseStorage<Id, U> {
    const LAYOUT: Layout = Layout::Sparse;

    fn zeroed() -> Self {
        Self {
            amounts: HashMap::new(),
        }
    }

    #[inline]
    fn get(&self, id: Id) -> U {
        self.amounts.get(&id).copied().unwrap_or(U::ZERO)
    }

    fn set(&mut self, id: Id, amount: U) {
        if amount > U::ZERO {
            self.amounts.insert(id, amount);
        } else {
            self.amounts.remove(&id);
        }
    }

    fn clear(&mut self) {
        self.amounts.clear();
    }
}

/// Type-level layout selector; `DENSE` comes from [`prefers_dense`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Select<const DENSE: bool>;

/// Maps a [`Select`] to its concrete storage type.
pub trait LayoutFor<Id, U, const N: usize> {
    /// The selected storage.
    type Storage: AmountStorage<Id, U>;
}

impl<Id: ResourceId, U: Units, const N: usize> LayoutFor<Id, U, N> for Select<true> {
    type Storage = DenseStorage<Id, U, N>;
}

impl<Id: ResourceId, U: Units, const N: usize> LayoutFor<Id, U, N> for Select<false> {
    type Storage = SparseStorage<Id, U>;
}
