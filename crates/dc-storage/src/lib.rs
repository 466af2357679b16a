//! `dc-storage` — pallets and the rack system.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`pallet`]   | `Pallet`, `PalletLocation`, `PalletStore`                 |
//! | [`rack`]     | `Storage`, `Rack`, `StorageSystem`                        |
//! | [`registry`] | `PalletType`, `TypeRegistry`                              |
//!
//! Each pallet type owns a dedicated `StorageSystem`.  Two counters on the
//! type track capacity promised ahead of physical movement:
//!
//! - `claimed`: pallets promised to orders that have not started assembly.
//! - `reserved_cells`: empty rack cells already promised to inbound pallets
//!   released from the rack wait gate but not yet stored.

pub mod pallet;
pub mod rack;
pub mod registry;


pub use pallet::{Pallet, PalletLocation, PalletStore};
pub use rack::{Rack, Storage, StorageSystem};
pub use registry::{PalletType, TypeRegistry};
