//! Forklifts and their ownership tag.

use dc_core::{DockId, ForkliftId, PalletId};

/// Who holds a forklift right now.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ForkliftOwner {
    #[default]
    Unassigned,
    /// Serving a dock (loading or unloading a truck).
    Dock(DockId),
    /// Carrying one pallet.
    Pallet(PalletId),
}

/// A mobile resource.  Only seize/release accounting is modelled; there is
/// no travel path.
#[derive(Clone, Debug)]
pub struct Forklift {
    pub id: ForkliftId,
    owner:  ForkliftOwner,
}

impl Forklift {
    pub fn new(id: ForkliftId) -> Self {
        Self { id, owner: ForkliftOwner::Unassigned }
    }

    #[inline]
    pub fn in_use(&self) -> bool {
        self.owner != ForkliftOwner::Unassigned
    }

    #[inline]
    pub fn owner(&self) -> ForkliftOwner {
        self.owner
    }

    /// Only [`ResourceHandler`][crate::ResourceHandler] changes ownership.
    #[inline]
    pub(crate) fn set_owner(&mut self, owner: ForkliftOwner) {
        self.owner = owner;
    }
}

/// The building's forklift fleet, indexed by `ForkliftId`.
#[derive(Clone, Debug, Default)]
pub struct ForkliftFleet {
    units: Vec<Forklift>,
}

impl ForkliftFleet {
    pub fn new(count: u16) -> Self {
        Self { units: (0..count).map(|i| Forklift::new(ForkliftId(i))).collect() }
    }

    #[inline]
    pub fn get(&self, id: ForkliftId) -> Option<&Forklift> {
        self.units.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: ForkliftId) -> Option<&mut Forklift> {
        self.units.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Forklift> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn in_use_count(&self) -> usize {
        self.units.iter().filter(|u| u.in_use()).count()
    }
}
