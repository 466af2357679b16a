//! `dc-resource` — contended resources and the rules for handing them out.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`forklift`] | `Forklift`, `ForkliftOwner`, `ForkliftFleet`                |
//! | [`handler`]  | `ResourceHandler` — seize / release / limit enforcement     |
//! | [`dock`]     | `Dock`, `DockKind` — handler plus one exclusive forklift    |
//! | [`arbiter`]  | `choose_forklift_for_dock`, `choose_forklift_for_move`, `continue_moving` |
//!
//! # Ownership model
//!
//! A forklift records who owns it as a [`ForkliftOwner`] tag rather than a
//! bare flag, and the owner mirrors it (`Dock::processing_forklift`,
//! `Pallet::seized_forklift`).  A unit tagged `Dock(d)` can only be granted
//! back to `d`; a unit tagged `Pallet(p)` is never granted to anyone until
//! released.
//!
//! Concurrency limits are passed into every decision and never stored, so
//! they can change between calls.

pub mod arbiter;
pub mod dock;
pub mod forklift;
pub mod handler;


pub use arbiter::{ForkliftTask, choose_forklift_for_dock, choose_forklift_for_move, continue_moving};
pub use dock::{Dock, DockKind};
pub use forklift::{Forklift, ForkliftFleet, ForkliftOwner};
pub use handler::ResourceHandler;
