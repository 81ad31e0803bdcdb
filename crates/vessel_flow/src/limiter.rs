//! # Rate Limiters
//!
//! Decorators that wrap a source or sink and present a throughput-capped
//! view of it. The wrapped object is only ever mutated through the exchange
//! engine, with the token the engine handed the limiter.
//!
//! ## Budget
//!
//! ```text
//! budget = bandwidth × limit        (limit ∈ [0, 1], default 1)
//! ```
//!
//! ## Apportionment
//!
//! Packet limiters split the budget greedily in packet order. Earlier
//! identifiers are served first and can starve later ones:
//!
//! ```text
//! raw     { Fuel: 8, Oxygen: 8 }    budget 10
//! capped  { Fuel: 8, Oxygen: 2 }
//! ```
//!
//! ## Cache
//!
//! The capped view is computed lazily and kept until the next
//! `set_bandwidth`, `set_limit` or transfer through the limiter.

use std::cell::RefCell;

use crate::exchange::{ExchangeToken, Sink, Source, UnitSink, UnitSource};
use crate::model::ResourceModel;
use crate::packet::Packet;
use crate::units::Units;

/// Bandwidth and request-limit fraction shared by every limiter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Throttle<U: Units> {
    bandwidth: U,
    limit: f32,
}

impl<U: Units> Throttle<U> {
    /// Full-limit throttle.
    #[must_use]
    pub fn new(bandwidth: U) -> Self {
        Self::with_limit(bandwidth, 1.0)
    }

    /// Throttle with an explicit limit fraction, clamped into `[0, 1]`.
    #[must_use]
    pub fn with_limit(bandwidth: U, limit: f32) -> Self {
        Self {
            bandwidth: bandwidth.max_zero(),
            limit: clamp_fraction(limit),
        }
    }

    /// Units allowed through per negotiation.
    #[inline]
    #[must_use]
    pub fn budget(&self) -> U {
        self.bandwidth.scale(self.limit)
    }

    /// Current bandwidth.
    #[inline]
    #[must_use]
    pub const fn bandwidth(&self) -> U {
        self.bandwidth
    }

    /// Current limit fraction.
    #[inline]
    #[must_use]
    pub const fn limit(&self) -> f32 {
        self.limit
    }
}

fn clamp_fraction(limit: f32) -> f32 {
    if limit.is_nan() {
        0.0
    } else {
        limit.clamp(0.0, 1.0)
    }
}

#[derive(Debug)]
enum Cache<T> {
    Dirty,
    Clean(T),
}

impl<T: Clone> Cache<T> {
    fn get_or_rebuild(&mut self, rebuild: impl FnOnce() -> T) -> T {
        match self {
            Self::Clean(value) => value.clone(),
            Self::Dirty => {
                let value = rebuild();
                *self = Self::Clean(value.clone());
                value
            }
        }
    }
}

/// Greedy, order-preserving split of `budget` across `raw`.
fn apportion<M: ResourceModel>(raw: &Packet<M>, budget: M::Units) -> Packet<M> {
    let mut remaining = budget;
    raw.iter()
        .map(|(id, amount)| {
            let take = amount.max_zero().min_of(remaining);
            remaining = remaining.sub_floored(take);
            (id, take)
        })
        .collect()
}

// =============================================================================
// Packet limiters
// =============================================================================

/// Caps what a [`Sink`] requests.
pub struct SinkLimiter<'a, M: ResourceModel, K: Sink<M> + ?Sized> {
    inner: &'a mut K,
    throttle: Throttle<M::Units>,
    cache: RefCell<Cache<Packet<M>>>,
}

impl<'a, M: ResourceModel, K: Sink<M> + ?Sized> SinkLimiter<'a, M, K> {
    /// Wraps `inner` with a full-limit throttle.
    pub fn new(inner: &'a mut K, bandwidth: M::Units) -> Self {
        Self::with_throttle(inner, Throttle::new(bandwidth))
    }

    /// Wraps `inner` with a limit fraction.
    pub fn with_limit(inner: &'a mut K, bandwidth: M::Units, limit: f32) -> Self {
        Self::with_throttle(inner, Throttle::with_limit(bandwidth, limit))
    }

    /// Wraps `inner` with an existing throttle.
    pub fn with_throttle(inner: &'a mut K, throttle: Throttle<M::Units>) -> Self {
        Self {
            inner,
            throttle,
            cache: RefCell::new(Cache::Dirty),
        }
    }

    /// Changes the bandwidth and invalidates the cache.
    pub fn set_bandwidth(&mut self, bandwidth: M::Units) {
        self.throttle.bandwidth = bandwidth.max_zero();
        self.invalidate();
    }

    /// Changes the limit fraction and invalidates the cache.
    pub fn set_limit(&mut self, limit: f32) {
        self.throttle.limit = clamp_fraction(limit);
        self.invalidate();
    }

    /// Current throttle settings.
    #[must_use]
    pub const fn throttle(&self) -> &Throttle<M::Units> {
        &self.throttle
    }

    /// Returns true if the next read rebuilds the capped view.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        matches!(*self.cache.borrow(), Cache::Dirty)
    }

    /// The wrapped sink.
    #[must_use]
    pub fn inner(&self) -> &K {
        self.inner
    }

    fn invalidate(&mut self) {
        *self.cache.get_mut() = Cache::Dirty;
    }
}

impl<M: ResourceModel, K: Sink<M> + ?Sized> Sink<M> for SinkLimiter<'_, M, K> {
    fn requested_amounts(&self) -> Packet<M> {
        self.cache.borrow_mut().get_or_rebuild(|| {
            let capped = apportion(&self.inner.requested_amounts(), self.throttle.budget());
            tracing::trace!(packet = ?capped, "sink limiter rebuilt");
            capped
        })
    }

    fn increase_amounts(&mut self, packet: &Packet<M>, token: ExchangeToken) {
        self.inner.increase_amounts(packet, token);
        self.invalidate();
    }
}

/// Caps what a [`Source`] offers.
pub struct SourceLimiter<'a, M: ResourceModel, S: Source<M> + ?Sized> {
    inner: &'a mut S,
    throttle: Throttle<M::Units>,
    cache: RefCell<Cache<Packet<M>>>,
}

impl<'a, M: ResourceModel, S: Source<M> + ?Sized> SourceLimiter<'a, M, S> {
    /// Wraps `inner` with a full-limit throttle.
    pub fn new(inner: &'a mut S, bandwidth: M::Units) -> Self {
        Self::with_throttle(inner, Throttle::new(bandwidth))
    }

    /// Wraps `inner` with a limit fraction.
    pub fn with_limit(inner: &'a mut S, bandwidth: M::Units, limit: f32) -> Self {
        Self::with_throttle(inner, Throttle::with_limit(bandwidth, limit))
    }

    /// Wraps `inner` with an existing throttle.
    pub fn with_throttle(inner: &'a mut S, throttle: Throttle<M::Units>) -> Self {
        Self {
            inner,
            throttle,
            cache: RefCell::new(Cache::Dirty),
        }
    }

    /// Changes the bandwidth and invalidates the cache.
    pub fn set_bandwidth(&mut self, bandwidth: M::Units) {
        self.throttle.bandwidth = bandwidth.max_zero();
        self.invalidate();
    }

    /// Changes the limit fraction and invalidates the cache.
    pub fn set_limit(&mut self, limit: f32) {
        self.throttle.limit = clamp_fraction(limit);
        self.invalidate();
    }

    /// Current throttle settings.
    #[must_use]
    pub const fn throttle(&self) -> &Throttle<M::Units> {
        &self.throttle
    }

    /// Returns true if the next read rebuilds the capped view.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        matches!(*self.cache.borrow(), Cache::Dirty)
    }

    /// The wrapped source.
    #[must_use]
    pub fn inner(&self) -> &S {
        self.inner
    }

    fn invalidate(&mut self) {
        *self.cache.get_mut() = Cache::Dirty;
    }
}

impl<M: ResourceModel, S: Source<M> + ?Sized> Source<M> for SourceLimiter<'_, M, S> {
    fn available_amounts(&self) -> Packet<M> {
        self.cache.borrow_mut().get_or_rebuild(|| {
            let capped = apportion(&self.inner.available_amounts(), self.throttle.budget());
            tracing::trace!(packet = ?capped, "source limiter rebuilt");
            capped
        })
    }

    fn decrease_amounts(&mut self, packet: &Packet<M>, token: ExchangeToken) {
        self.inner.decrease_amounts(packet, token);
        self.invalidate();
    }
}

// =============================================================================
// Scalar limiters
// =============================================================================

/// Caps what a [`UnitSink`] requests.
pub struct UnitSinkLimiter<'a, K: UnitSink + ?Sized> {
    inner: &'a mut K,
    throttle: Throttle<K::Units>,
    cache: RefCell<Cache<K::Units>>,
}

impl<'a, K: UnitSink + ?Sized> UnitSinkLimiter<'a, K> {
    /// Wraps `inner` with a full-limit throttle.
    pub fn new(inner: &'a mut K, bandwidth: K::Units) -> Self {
        Self::with_limit(inner, bandwidth, 1.0)
    }

    /// Wraps `inner` with a limit fraction.
    pub fn with_limit(inner: &'a mut K, bandwidth: K::Units, limit: f32) -> Self {
        Self {
            inner,
            throttle: Throttle::with_limit(bandwidth, limit),
            cache: RefCell::new(Cache::Dirty),
        }
    }

    /// Changes the bandwidth and invalidates the cache.
    pub fn set_bandwidth(&mut self, bandwidth: K::Units) {
        self.throttle.bandwidth = bandwidth.max_zero();
        *self.cache.get_mut() = Cache::Dirty;
    }

    /// Changes the limit fraction and invalidates the cache.
    pub fn set_limit(&mut self, limit: f32) {
        self.throttle.limit = clamp_fraction(limit);
        *self.cache.get_mut() = Cache::Dirty;
    }

    /// Current throttle settings.
    #[must_use]
    pub const fn throttle(&self) -> &Throttle<K::Units> {
        &self.throttle
    }
}

impl<K: UnitSink + ?Sized> UnitSink for UnitSinkLimiter<'_, K> {
    type Units = K::Units;

    fn requested_units(&self) -> K::Units {
        self.cache.borrow_mut().get_or_rebuild(|| {
            let capped = self.inner.requested_units().max_zero().min_of(self.throttle.budget());
            tracing::trace!(amount = ?capped, "unit sink limiter rebuilt");
            capped
        })
    }

    fn increase_units(&mut self, amount: K::Units, token: ExchangeToken) {
        self.inner.increase_units(amount, token);
        *self.cache.get_mut() = Cache::Dirty;
    }
}

/// Caps what a [`UnitSource`] offers.
pub struct UnitSourceLimiter<'a, S: UnitSource + ?Sized> {
    inner: &'a mut S,
    throttle: Throttle<S::Units>,
    cache: RefCell<Cache<S::Units>>,
}

impl<'a, S: UnitSource + ?Sized> UnitSourceLimiter<'a, S> {
    /// Wraps `inner` with a full-limit throttle.
    pub fn new(inner: &'a mut S, bandwidth: S::Units) -> Self {
        Self::with_limit(inner, bandwidth, 1.0)
    }

    /// Wraps `inner` with a limit fraction.
    pub fn with_limit(inner: &'a mut S, bandwidth: S::Units, limit: f32) -> Self {
        Self {
            inner,
            throttle: Throttle::with_limit(bandwidth, limit),
            cache: RefCell::new(Cache::Dirty),
        }
    }

    /// Changes the bandwidth and invalidates the cache.
    pub fn set_bandwidth(&mut self, bandwidth: S::Units) {
        self.throttle.bandwidth = bandwidth.max_zero();
        *self.cache.get_mut() = Cache::Dirty;
    }

    /// Changes the limit fraction and invalidates the cache.
    pub fn set_limit(&mut self, limit: f32) {
        self.throttle.limit = clamp_fraction(limit);
        *self.cache.get_mut() = Cache::Dirty;
    }

    /// Current throttle settings.
    #[must_use]
    pub const fn throttle(&self) -> &Throttle<S::Units> {
        &self.throttle
    }
}

impl<S: UnitSource + ?Sized> UnitSource for UnitSourceLimiter<'_, S> {
    type Units = S::Units;

    fn available_units(&self) -> S::Units {
        self.cache.borrow_mut().get_or_rebuild(|| {
            let capped = self.inner.available_units().max_zero().min_of(self.throttle.budget());
            tracing::trace!(amount = ?capped, "unit source limiter rebuilt");
            capped
        })
    }

    fn decrease_units(&mut self, amount: S::Units, token: ExchangeToken) {
        self.inner.decrease_units(amount, token);
        *self.cache.get_mut() = Cache::Dirty;
    }
}
