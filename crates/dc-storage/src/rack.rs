//! Fixed-capacity pallet containers.
//!
//! [`Storage`] is the plain container (a dock floor, the standby area, one
//! rack).  [`StorageSystem`] aggregates the racks dedicated to one pallet
//! type and answers capacity questions for the pool as a whole.

use dc_core::{PalletId, RackId};

// ── Storage ───────────────────────────────────────────────────────────────────

/// A fixed-capacity, insertion-ordered set of pallets.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Storage {
    capacity: u32,
    pallets:  Vec<PalletId>,
}

impl Storage {
    pub fn new(capacity: u32) -> Self {
        Self { capacity, pallets: Vec::with_capacity(capacity as usize) }
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.pallets.len() as u32
    }

    #[inline]
    pub fn free_cells(&self) -> u32 {
        self.capacity - self.size()
    }

    pub fn contains(&self, pallet: PalletId) -> bool {
        self.pallets.contains(&pallet)
    }

    /// Store `pallet`.  Returns `false` (and stores nothing) when full.
    pub fn put(&mut self, pallet: PalletId) -> bool {
        if self.free_cells() == 0 {
            return false;
        }
        debug_assert!(!self.contains(pallet), "{pallet} stored twice");
        self.pallets.push(pallet);
        true
    }

    /// Remove `pallet`, preserving the order of the rest.
    pub fn take(&mut self, pallet: PalletId) -> bool {
        match self.pallets.iter().position(|&p| p == pallet) {
            Some(i) => {
                self.pallets.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn pallets(&self) -> &[PalletId] {
        &self.pallets
    }
}

// ── Rack ──────────────────────────────────────────────────────────────────────

/// One physical rack block of the rack system.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rack {
    pub id:    RackId,
    pub cells: Storage,
}

impl Rack {
    pub fn new(id: RackId, capacity: u32) -> Self {
        Self { id, cells: Storage::new(capacity) }
    }
}

// ── StorageSystem ─────────────────────────────────────────────────────────────

/// All racks dedicated to one pallet type, viewed as a single pool.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageSystem {
    racks: Vec<Rack>,
}

impl StorageSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rack(&mut self, rack: Rack) {
        self.racks.push(rack);
    }

    pub fn racks(&self) -> &[Rack] {
        &self.racks
    }

    pub fn capacity(&self) -> u32 {
        self.racks.iter().map(|r| r.cells.capacity()).sum()
    }

    pub fn size(&self) -> u32 {
        self.racks.iter().map(|r| r.cells.size()).sum()
    }

    /// Empty cells across all racks of the pool.
    pub fn n_free_cells(&self) -> u32 {
        self.capacity() - self.size()
    }

    /// Store `pallet` in the first rack with a free cell.
    pub fn put(&mut self, pallet: PalletId) -> Option<RackId> {
        self.racks
            .iter_mut()
            .find(|r| r.cells.free_cells() > 0)
            .map(|r| {
                r.cells.put(pallet);
                r.id
            })
    }

    /// Remove `pallet` from rack `rack`.  Returns `false` if it is not there.
    pub fn take(&mut self, rack: RackId, pallet: PalletId) -> bool {
        self.racks
            .iter_mut()
            .find(|r| r.id == rack)
            .is_some_and(|r| r.cells.take(pallet))
    }

    /// Stored pallets in rack order, then cell order.
    pub fn pallets(&self) -> impl Iterator<Item = PalletId> + '_ {
        self.racks.iter().flat_map(|r| r.cells.pallets().iter().copied())
    }
}
