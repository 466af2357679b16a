//! Strongly typed identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can key maps and sort without
//! ceremony.  Dense registries (types, docks, forklifts, racks) index `Vec`s
//! via `.index()`; sparse ones (pallets, orders, trucks) key `FxHashMap`s and
//! are allocated from monotonic counters, so an id is never reused within a
//! run.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The id following `self`; used by monotonic allocators.
            #[inline]
            pub fn next(self) -> $name {
                $name(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// A single pallet.  Allocated when a pallet enters the building.
    pub struct PalletId(u32);
}

typed_id! {
    /// Internal order key.  Unlike the cyclic display number this never wraps.
    pub struct OrderId(u32);
}

typed_id! {
    /// A truck, loading or unloading.
    pub struct TruckId(u32);
}

typed_id! {
    /// Index of a pallet category in the type registry.
    pub struct TypeId(u16);
}

typed_id! {
    /// Index of a dock (load and unload docks share one index space).
    pub struct DockId(u16);
}

typed_id! {
    /// Index of a forklift in the fleet.
    pub struct ForkliftId(u16);
}

typed_id! {
    /// Index of a rack (physical storage block) in the rack system.
    pub struct RackId(u16);
}

/// A resource handler a pallet can be routed to: one of the docks or the
/// standby storage area.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandlerId {
    Dock(DockId),
    Standby,
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerId::Dock(d) => write!(f, "{d}"),
            HandlerId::Standby => f.write_str("Standby"),
        }
    }
}
