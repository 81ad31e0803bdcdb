//! # Exchange Protocol
//!
//! Negotiates how many units move from a source to a sink.
//!
//! ## Capabilities
//!
//! ```text
//! Source: available amounts (public)  + decrease (needs ExchangeToken)
//! Sink:   requested amounts (public)  + increase (needs ExchangeToken)
//! ```
//!
//! An [`ExchangeToken`] can only be minted inside this crate, by the
//! negotiation entry points below. Code outside the crate can implement
//! sources and sinks, and forward a token it was handed, but can never call
//! a mutator on its own.
//!
//! ## Negotiation
//!
//! 1. Read the sink's demand and the source's supply.
//! 2. All-negligible demand or supply: `Unchanged`, nothing touched.
//! 3. Compromise per identifier = `clamp(demand, 0, supply)`.
//! 4. All-negligible compromise: `Unchanged`.
//! 5. `sink.increase(compromise)`, then `source.decrease(compromise)`: `Changed`.
//!
//! There is no partial state: both sides receive the whole packet or nothing.

use crate::model::ResourceModel;
use crate::packet::Packet;
use crate::units::Units;

/// Outcome of a negotiation. Never an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeResult {
    /// Nothing moved.
    Unchanged,
    /// Units moved from the source to the sink.
    Changed,
}

impl ExchangeResult {
    /// Returns true if units moved.
    #[inline]
    #[must_use]
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Permission to call a source/sink mutator for one negotiation step.
///
/// Only the exchange engine constructs tokens.
#[derive(Debug)]
pub struct ExchangeToken {
    _private: (),
}

impl ExchangeToken {
    #[inline]
    pub(crate) const fn mint() -> Self {
        Self { _private: () }
    }
}

// =============================================================================
// Scalar form
// =============================================================================

/// Something a single amount can be drawn from.
pub trait UnitSource {
    /// The unit type.
    type Units: Units;

    /// Amount that could be handed out right now.
    fn available_units(&self) -> Self::Units;

    /// Removes `amount`. Called by the exchange engine only.
    fn decrease_units(&mut self, amount: Self::Units, token: ExchangeToken);

    /// Hands as much as `consumer` requests, see [`exchange_units`].
    fn provide_to<C>(&mut self, consumer: &mut C) -> ExchangeResult
    where
        Self: Sized,
        C: UnitSink<Units = Self::Units> + ?Sized,
    {
        exchange_units(self, consumer)
    }
}

/// Something a single amount can be added to.
pub trait UnitSink {
    /// The unit type.
    type Units: Units;

    /// Amount needed to be full.
    fn requested_units(&self) -> Self::Units;

    /// Adds `amount`. Called by the exchange engine only.
    fn increase_units(&mut self, amount: Self::Units, token: ExchangeToken);

    /// Takes as much as `provider` can give, see [`exchange_units`].
    fn receive_from<P>(&mut self, provider: &mut P) -> ExchangeResult
    where
        Self: Sized,
        P: UnitSource<Units = Self::Units> + ?Sized,
    {
        exchange_units(provider, self)
    }
}

/// Moves `clamp(requested, 0, available)` units from `provider` to `consumer`.
pub fn exchange_units<P, C>(provider: &mut P, consumer: &mut C) -> ExchangeResult
where
    P: UnitSource + ?Sized,
    C: UnitSink<Units = P::Units> + ?Sized,
{
    let demand = consumer.requested_units();
    let supply = provider.available_units();

    if demand.is_negligible() || supply.is_negligible() {
        return ExchangeResult::Unchanged;
    }

    let compromise = demand.clamp_to(supply);
    if compromise.is_negligible() {
        return ExchangeResult::Unchanged;
    }

    consumer.increase_units(compromise, ExchangeToken::mint());
    provider.decrease_units(compromise, ExchangeToken::mint());

    tracing::trace!(amount = ?compromise, "units exchanged");
    ExchangeResult::Changed
}

// =============================================================================
// Packet form
// =============================================================================

/// Something a multi-resource packet can be drawn from.
pub trait Source<M: ResourceModel> {
    /// Amounts that could be handed out right now, per identifier.
    fn available_amounts(&self) -> Packet<M>;

    /// Removes every entry of `packet`. Called by the exchange engine only.
    fn decrease_amounts(&mut self, packet: &Packet<M>, token: ExchangeToken);

    /// Hands as much as `sink` requests, see [`exchange`].
    fn provide_to<K>(&mut self, sink: &mut K) -> ExchangeResult
    where
        Self: Sized,
        K: Sink<M> + ?Sized,
    {
        exchange(self, sink)
    }
}

/// Something a multi-resource packet can be added to.
pub trait Sink<M: ResourceModel> {
    /// Amounts needed to be full, per identifier.
    fn requested_amounts(&self) -> Packet<M>;

    /// Adds every entry of `packet`. Called by the exchange engine only.
    fn increase_amounts(&mut self, packet: &Packet<M>, token: ExchangeToken);

    /// Takes as much as `source` can give, see [`exchange`].
    fn receive_from<S>(&mut self, source: &mut S) -> ExchangeResult
    where
        Self: Sized,
        S: Source<M> + ?Sized,
    {
        exchange(source, self)
    }
}

/// Negotiates a multi-resource transfer from `source` to `sink`.
///
/// Identifiers the sink requests but the source does not list are skipped.
pub fn exchange<M, S, K>(source: &mut S, sink: &mut K) -> ExchangeResult
where
    M: ResourceModel,
    S: Source<M> + ?Sized,
    K: Sink<M> + ?Sized,
{
    let demand = sink.requested_amounts();
    let supply = source.available_amounts();

    if demand.is_negligible() || supply.is_negligible() {
        return ExchangeResult::Unchanged;
    }

    let compromise: Packet<M> = demand
        .iter()
        .filter_map(|(id, wanted)| supply.get(id).map(|offered| (id, wanted.clamp_to(offered))))
        .collect();

    if compromise.is_negligible() {
        return ExchangeResult::Unchanged;
    }

    sink.increase_amounts(&compromise, ExchangeToken::mint());
    source.decrease_amounts(&compromise, ExchangeToken::mint());

    tracing::trace!(packet = ?compromise, "packet exchanged");
    ExchangeResult::Changed
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use std::sync::Arc;

    use super::*;
    use crate::container::Container;
    use crate::resource::make_resource;
    use crate::store::{CapacityTable, Store};

    crate::resource_model! {
        /// Test model.
        pub struct Life;
        units = i32;
        /// Test ids.
        pub enum Vital { Health, Armor }
    }

    crate::resource_model! {
        /// Float model.
        pub struct Lamp;
        units = f32;
        /// Test ids.
        pub enum Oil { Kerosene, Whale }
    }

    const TRACE: f32 = f32::EPSILON / 4.0;

    /// Records the order mutators are called in.
    struct Recorder {
        supply: Packet<Life>,
        demand: Packet<Life>,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Recorder {
        fn new(supply: Packet<Life>, demand: Packet<Life>, log: &Rc<RefCell<Vec<&'static str>>>) -> Self {
            Self {
                supply,
                demand,
                log: Rc::clone(log),
            }
        }
    }

    impl Source<Life> for Recorder {
        fn available_amounts(&self) -> Packet<Life> {
            self.supply.clone()
        }

        fn decrease_amounts(&mut self, _packet: &Packet<Life>, _token: ExchangeToken) {
            self.log.borrow_mut().push("decrease");
        }
    }

    impl Sink<Life> for Recorder {
        fn requested_amounts(&self) -> Packet<Life> {
            self.demand.clone()
        }

        fn increase_amounts(&mut self, _packet: &Packet<Life>, _token: ExchangeToken) {
            self.log.borrow_mut().push("increase");
        }
    }

    #[test]
    fn test_scalar_exchange_clamps_to_supply() {
        let mut provider = Container::new(10u32);
        let mut consumer = Container::empty(25u32);
        provider.set_amount(4);

        assert_eq!(exchange_units(&mut provider, &mut consumer), ExchangeResult::Changed);
        assert_eq!(consumer.amount(), 4);
        assert_eq!(provider.amount(), 0);
    }

    #[test]
    fn test_scalar_exchange_unchanged_when_full() {
        let mut provider = Container::new(10u32);
        let mut consumer = Container::new(10u32);

        assert_eq!(consumer.receive_from(&mut provider), ExchangeResult::Unchanged);
        assert_eq!(provider.amount(), 10);
    }

    #[test]
    fn test_sub_epsilon_float_is_unchanged() {
        let mut provider = Container::new(1.0f32);
        provider.set_amount(TRACE);
        let mut consumer = Container::empty(1.0f32);

        assert_eq!(provider.provide_to(&mut consumer), ExchangeResult::Unchanged);
        assert_eq!(consumer.amount().to_bits(), 0.0f32.to_bits());
        assert_eq!(provider.amount().to_bits(), TRACE.to_bits());

        let mut full = Container::new(TRACE);
        let mut tank = Container::new(1.0f32);
        assert_eq!(full.receive_from(&mut tank), ExchangeResult::Unchanged);
        assert_eq!(full.amount().to_bits(), TRACE.to_bits());
        assert_eq!(tank.amount().to_bits(), 1.0f32.to_bits());
    }

    #[test]
    fn test_sub_epsilon_packets_are_unchanged() {
        let mut lamp = Store::new(CapacityTable::<Lamp>::uniform(1.0).shared());
        let mut trickle = make_resource::<Lamp>(Oil::Kerosene, TRACE).and(Oil::Whale, TRACE);
        let lamp_before = lamp.save_state();
        let trickle_before = trickle.clone();

        assert_eq!(lamp.receive_from(&mut trickle), ExchangeResult::Unchanged);
        assert_eq!(lamp.save_state(), lamp_before);
        assert_eq!(trickle, trickle_before);

        let wick = CapacityTable::<Lamp>::new().with(Oil::Kerosene, TRACE);
        let mut wick = Store::new(Arc::new(wick));
        let mut barrel = make_resource::<Lamp>(Oil::Kerosene, 10.0);
        let barrel_before = barrel.clone();

        assert_eq!(barrel.provide_to(&mut wick), ExchangeResult::Unchanged);
        assert_eq!(wick.available(Oil::Kerosene).to_bits(), 0.0f32.to_bits());
        assert_eq!(barrel, barrel_before);
    }

    #[test]
    fn test_increase_before_decrease() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut source = Recorder::new(Packet::single(Vital::Health, 5), Packet::new(), &log);
        let mut sink = Recorder::new(Packet::new(), Packet::single(Vital::Health, 3), &log);

        assert!(exchange(&mut source, &mut sink).is_changed());
        assert_eq!(*log.borrow(), vec!["increase", "decrease"]);
    }

    #[test]
    fn test_missing_supply_entry_is_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut source = Recorder::new(Packet::single(Vital::Armor, 5), Packet::new(), &log);
        let mut sink = Recorder::new(Packet::new(), Packet::single(Vital::Health, 3), &log);

        assert_eq!(exchange(&mut source, &mut sink), ExchangeResult::Unchanged);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_negative_demand_clamps_to_zero() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut source = Recorder::new(Packet::single(Vital::Health, 5), Packet::new(), &log);
        let demand = Packet::single(Vital::Health, -3).with(Vital::Armor, 2);
        let mut sink = Recorder::new(Packet::new(), demand, &log);

        // Armor has no supply entry, Health clamps to zero.
        assert_eq!(exchange(&mut source, &mut sink), ExchangeResult::Unchanged);
        assert!(log.borrow().is_empty());
    }
}
