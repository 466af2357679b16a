//! `dc-core` — foundational types for the distribution-center simulation.
//!
//! Every other `dc-*` crate depends on this one.  It has no `dc-*`
//! dependencies and only `rand` and `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                         |
//! |------------|------------------------------------------------------------------|
//! | [`ids`]    | `PalletId`, `OrderId`, `DockId`, `ForkliftId`, `TypeId`, `HandlerId`, … |
//! | [`time`]   | `Tick`, `SimClock`                                               |
//! | [`config`] | `WarehouseConfig`, `ForkliftLimits`                              |
//! | [`rng`]    | `SimRng` (seeded, deterministic)                                 |
//! | [`error`]  | `DcError`, `DcResult`                                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ForkliftLimits, WarehouseConfig};
pub use error::{DcError, DcResult};
pub use ids::{DockId, ForkliftId, HandlerId, OrderId, PalletId, RackId, TruckId, TypeId};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
