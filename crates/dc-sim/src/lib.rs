//! `dc-sim` — the warehouse state and the event loop that drives it.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Events:    drain events due now, in push order:
//!                   OrderTimer / ScriptedOrder   → create_order
//!                   Loading/UnloadingTruckArrives → park the truck
//!                   GateTick                     → rack, dock-storage, lane gates
//!                   MoveFinished                 → deliver pallet, release forklift
//!                   DockStepFinished             → one pallet truck ↔ dock
//!                   ManeuverFinished             → truck reaches / leaves its dock
//!   ② Assembly:  admit queued orders; move standby orders to free docks.
//!   ③ Dispatch:  offer forklifts to pending requests, oldest first.
//! ```
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`state`]       | `WarehouseState` aggregate, invariant report               |
//! | [`order`]       | `Order`, `OrderBook`, `OrderGenerator`, `OrderTemplate`    |
//! | [`truck`]       | `Truck`, `TruckTable`                                      |
//! | [`matcher`]     | order admission and storage reservation                    |
//! | [`coordinator`] | truck-to-dock and order-to-truck matching                  |
//! | [`gates`]       | wait gates and `MovementLane`s                             |
//! | [`transport`]   | `TransportQueue`, `on_forklift_request`                    |
//! | [`sim`]         | `Sim` event loop                                           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dc_core::WarehouseConfig;
//! use dc_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(WarehouseConfig::default()).build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("{:?}", sim.state.stats);
//! ```

pub mod builder;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod gates;
pub mod matcher;
pub mod observer;
pub mod order;
pub mod sim;
pub mod state;
pub mod transport;
pub mod truck;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use event::{Event, Lane};
pub use gates::{LaneDirection, MovementLane};
pub use observer::{NoopObserver, SimObserver};
pub use order::{Order, OrderBook, OrderGenerator, OrderState, OrderTemplate};
pub use sim::Sim;
pub use state::{Throughput, WarehouseState};
pub use transport::TransportQueue;
pub use truck::{Truck, TruckKind, TruckTable};
