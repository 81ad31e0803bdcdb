//! # Vessel Flow
//!
//! Bounded numeric resources that move between producers and consumers.
//!
//! ## Design Principles
//!
//! 1. **Negotiated transfer** - Units only move through [`exchange`] / [`exchange_units`]
//! 2. **Clamp, never fail** - Amounts stay in `[0, capacity]`, sub-epsilon amounts count as zero
//! 3. **Compile-time layout** - Each resource model picks dense or sparse storage once
//! 4. **Conservation** - Stores and containers are stolen from, never duplicated
//!
//! ## Thread Safety
//!
//! Everything here is single-threaded. A store shared between limiters and
//! adapters is borrowed mutably by one of them at a time.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vessel_flow::{make_resource, CapacityTable, Sink, SinkLimiter, Store};
//!
//! vessel_flow::resource_model! {
//!     /// Ship tank contents.
//!     pub struct Tank;
//!     units = f32;
//!     /// Tank resources.
//!     pub enum TankResource { Fuel, Oxygen }
//! }
//!
//! let table = Arc::new(CapacityTable::<Tank>::uniform(100.0));
//! let mut tank = Store::new(table);
//!
//! // At most 10 units per negotiation, fuel first.
//! let mut intake = SinkLimiter::<Tank, _>::new(&mut tank, 10.0);
//! intake.receive_from(&mut make_resource(TankResource::Fuel, 50.0));
//!
//! assert!((tank.available(TankResource::Fuel) - 10.0).abs() < f32::EPSILON);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod adapter;
pub mod config;
pub mod container;
pub mod error;
pub mod exchange;
pub mod layout;
pub mod limiter;
pub mod model;
pub mod packet;
pub mod resource;
pub mod store;
pub mod units;

pub use adapter::ContainerAdapter;
pub use container::Container;
pub use error::{FlowError, FlowResult};
pub use exchange::{
    exchange, exchange_units, ExchangeResult, ExchangeToken, Sink, Source, UnitSink, UnitSource,
};
pub use layout::{AmountStorage, DenseStorage, Layout, SparseStorage};
pub use limiter::{SinkLimiter, SourceLimiter, Throttle, UnitSinkLimiter, UnitSourceLimiter};
pub use model::{ResourceId, ResourceModel};
pub use packet::{Packet, StateTable};
pub use resource::{make_resource, Resource};
pub use store::{CapacityTable, ResourcePackage, Store, StoreSlot};
pub use units::Units;
