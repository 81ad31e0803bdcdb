//! # Containers
//!
//! One bounded scalar resource cell. The amount always stays in
//! `[0, capacity]`.

use crate::exchange::{exchange_units, ExchangeResult, ExchangeToken, UnitSink, UnitSource};
use crate::units::Units;

/// A single bounded amount.
///
/// Containers are not `Clone`: copying one would create resources out of
/// nothing. Use [`Container::steal_from`] to move contents instead.
#[derive(Debug, PartialEq)]
pub struct Container<U: Units> {
    capacity: U,
    amount: U,
}

impl<U: Units> Container<U> {
    /// Creates a full container.
    #[must_use]
    pub fn new(capacity: U) -> Self {
        let capacity = capacity.max_zero();
        Self {
            capacity,
            amount: capacity,
        }
    }

    /// Creates an empty container.
    #[must_use]
    pub fn empty(capacity: U) -> Self {
        Self {
            capacity: capacity.max_zero(),
            amount: U::ZERO,
        }
    }

    /// Returns the capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> U {
        self.capacity
    }

    /// Returns the current amount.
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> U {
        self.amount
    }

    /// Overwrites the amount, clamped into `[0, capacity]`.
    pub(crate) fn set_amount(&mut self, amount: U) {
        self.amount = amount.clamp_to(self.capacity);
    }

    /// Empties the container.
    pub fn reset(&mut self) {
        self.amount = U::ZERO;
    }

    /// Returns true if the amount is negligible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amount.is_negligible()
    }

    /// Returns true if nothing more fits.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.requested_units().is_negligible()
    }

    /// Restores a saved amount.
    pub fn load_state(&mut self, amount: U) {
        self.set_amount(amount);
    }

    /// Returns the amount to save.
    #[must_use]
    pub const fn save_state(&self) -> U {
        self.amount
    }

    /// Pulls as much of `other` as fits into this container.
    pub fn steal_from(&mut self, other: &mut Self) -> ExchangeResult {
        exchange_units(other, self)
    }
}

impl<U: Units> UnitSource for Container<U> {
    type Units = U;

    #[inline]
    fn available_units(&self) -> U {
        self.amount
    }

    fn decrease_units(&mut self, amount: U, _token: ExchangeToken) {
        self.amount = self.amount.sub_floored(amount);
    }
}

impl<U: Units> UnitSink for Container<U> {
    type Units = U;

    #[inline]
    fn requested_units(&self) -> U {
        self.capacity.sub_floored(self.amount)
    }

    fn increase_units(&mut self, amount: U, _token: ExchangeToken) {
        self.amount = self.amount.add_capped(amount, self.capacity);
    }
}
