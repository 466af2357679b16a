//! Pallet types and the type registry.

use dc_core::{DcError, DcResult, OrderId, PalletId, RackId, TypeId};

use crate::{Pallet, PalletLocation, PalletStore, Rack, StorageSystem};

/// Base weight every type gets when drawing inbound pallet types, so types
/// without outstanding demand are still restocked.
const BASE_RESTOCK_WEIGHT: f64 = 10.0;

// ── PalletType ────────────────────────────────────────────────────────────────

/// A pallet category with its own dedicated storage pool.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PalletType {
    pub id: TypeId,
    /// Pallets promised to orders that have not started assembling.
    pub claimed: u32,
    /// Empty cells promised to inbound pallets released from the rack gate.
    pub reserved_cells: u32,
    pub storage: StorageSystem,
    /// Stored pallets already reserved for an order but not yet moved out.
    reserved_in_stock: u32,
}

impl PalletType {
    pub fn new(id: TypeId) -> Self {
        Self {
            id,
            claimed: 0,
            reserved_cells: 0,
            storage: StorageSystem::new(),
            reserved_in_stock: 0,
        }
    }

    /// Empty rack cells of this type.
    #[inline]
    pub fn n_free_cells(&self) -> u32 {
        self.storage.n_free_cells()
    }

    /// Stored pallets not yet reserved for any order.
    #[inline]
    pub fn n_free_pallets(&self) -> u32 {
        self.storage.size() - self.reserved_in_stock
    }

    /// Reserve the first unreserved stored pallet for `order`.
    ///
    /// Racks are scanned in pool order, cells in storage order.
    pub fn get_pallet(&mut self, order: OrderId, pallets: &mut PalletStore) -> Option<PalletId> {
        let found = self
            .storage
            .pallets()
            .find(|&id| pallets.get(id).is_some_and(|p| !p.reserved))?;
        let pallet = pallets.get_mut(found)?;
        pallet.reserved = true;
        pallet.order = Some(order);
        self.reserved_in_stock += 1;
        Some(found)
    }

    /// Place `pallet` in the first rack with room.  Clears any rack-gate
    /// reservation it was holding.
    pub fn store(&mut self, pallet: &mut Pallet) -> Option<RackId> {
        debug_assert_eq!(pallet.type_id, self.id);
        let rack = self.storage.put(pallet.id)?;
        pallet.location = PalletLocation::Rack(rack);
        if pallet.reserved {
            self.reserved_in_stock += 1;
        }
        Some(rack)
    }

    /// Lift `pallet` out of its rack (a forklift picked it up).
    pub fn take(&mut self, pallet: &mut Pallet) -> bool {
        let PalletLocation::Rack(rack) = pallet.location else {
            return false;
        };
        if !self.storage.take(rack, pallet.id) {
            return false;
        }
        if pallet.reserved {
            self.reserved_in_stock -= 1;
        }
        pallet.location = PalletLocation::Transit;
        true
    }

    /// Restocking weight: base plus the demand not covered by stock.
    pub fn restock_weight(&self) -> f64 {
        BASE_RESTOCK_WEIGHT + self.claimed.saturating_sub(self.storage.size()) as f64
    }
}

// ── TypeRegistry ──────────────────────────────────────────────────────────────

/// All pallet types, indexed by `TypeId`.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeRegistry {
    types: Vec<PalletType>,
}

impl TypeRegistry {
    /// Build `type_count` types and deal `rack_count` racks among them with
    /// a stride, so type `i` owns racks `i, i + n, i + 2n, …`.
    pub fn with_racks(type_count: u16, rack_count: u16, rack_capacity: u32) -> Self {
        let mut types: Vec<PalletType> = (0..type_count).map(|i| PalletType::new(TypeId(i))).collect();
        if type_count > 0 {
            for r in 0..rack_count {
                types[(r % type_count) as usize]
                    .storage
                    .add_rack(Rack::new(RackId(r), rack_capacity));
            }
        }
        Self { types }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> Option<&PalletType> {
        self.types.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: TypeId) -> Option<&mut PalletType> {
        self.types.get_mut(id.index())
    }

    /// Like [`get`][Self::get] but fails with [`DcError::TypeNotFound`].
    pub fn find(&self, id: TypeId) -> DcResult<&PalletType> {
        self.get(id).ok_or(DcError::TypeNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PalletType> {
        self.types.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PalletType> {
        self.types.iter_mut()
    }

    /// Promise `capacities[i]` pallets of type `i` to a new order.
    pub fn claim(&mut self, capacities: &[u32]) {
        for (t, &c) in self.types.iter_mut().zip(capacities) {
            t.claimed += c;
        }
    }

    /// Convert a claim into fulfilment once the order starts assembling.
    pub fn unclaim(&mut self, capacities: &[u32]) {
        for (t, &c) in self.types.iter_mut().zip(capacities) {
            debug_assert!(t.claimed >= c, "{} claimed would go negative", t.id);
            t.claimed = t.claimed.saturating_sub(c);
        }
    }

    /// One restocking weight per type, in `TypeId` order.
    ///
    /// `headroom[i]` is how many more inbound pallets type `i` can still
    /// rack; a type with none left weighs 0 and is never drawn.
    pub fn restock_weights(&self, headroom: &[u32]) -> Vec<f64> {
        self.types
            .iter()
            .map(|t| match headroom.get(t.id.index()) {
                Some(&room) if room > 0 => t.restock_weight(),
                _ => 0.0,
            })
            .collect()
    }

    /// Fill every type's pool to `level` (fraction of capacity) with fresh
    /// unreserved pallets.  Returns the number of pallets created.
    pub fn spawn_initial_pallets(&mut self, level: f64, pallets: &mut PalletStore) -> u32 {
        let mut spawned = 0;
        for t in &mut self.types {
            let count = (t.storage.capacity() as f64 * level.clamp(0.0, 1.0)) as u32;
            for _ in 0..count {
                let id = pallets.spawn(t.id, PalletLocation::Transit);
                if let Some(p) = pallets.get_mut(id) {
                    t.store(p);
                }
                spawned += 1;
            }
        }
        spawned
    }
}
