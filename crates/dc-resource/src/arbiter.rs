//! Forklift arbitration: may this forklift start this task now?
//!
//! Both decisions are pure functions of the dock/pallet, the candidate unit,
//! and the current limit.  The caller offers candidates one at a time and
//! retries on a later tick when every candidate is refused.

use log::debug;

use dc_core::{DockId, HandlerId, PalletId};
use dc_storage::Pallet;

use crate::{Dock, Forklift, ForkliftOwner, ResourceHandler};

/// What a forklift is being requested for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ForkliftTask {
    /// Serve a dock: move pallets between the dock floor and a truck.
    DockService(DockId),
    /// Carry one pallet toward (or away from) `target`.
    PalletMove { pallet: PalletId, target: HandlerId },
}

/// Decide whether `unit` may serve `dock`.
///
/// Evaluated in order:
/// 1. a unit already in use is granted only if it is this dock's own;
/// 2. a dock that already has a different unit gets no second one;
/// 3. a handler over its (lowered) limit refuses and sheds the unit;
/// 4. otherwise seize, and on success assign the unit to the dock.
pub fn choose_forklift_for_dock(dock: &mut Dock, unit: &mut Forklift, limit: u32) -> bool {
    if unit.in_use() {
        return dock.processing_forklift() == Some(unit.id);
    }

    if dock.processing_forklift().is_some() {
        return false;
    }

    if dock.handler.release_unused(unit, limit) {
        debug!("{}: shrinking to {limit} forklifts, refused {}", dock.id, unit.id);
        return false;
    }

    if dock.handler.seize(unit, ForkliftOwner::Dock(dock.id), limit) {
        dock.assign_forklift(unit.id);
        return true;
    }

    false
}

/// Decide whether `unit` may carry `pallet`, counting against `target`.
///
/// Refused at once if the unit is busy or the pallet already has a unit;
/// otherwise the same shrink-then-seize sequence as the dock decision.
pub fn choose_forklift_for_move(
    pallet: &mut Pallet,
    unit:   &mut Forklift,
    limit:  u32,
    target: &mut ResourceHandler,
) -> bool {
    if unit.in_use() || pallet.seized_forklift.is_some() {
        return false;
    }

    if target.release_unused(unit, limit) {
        debug!("{}: shrinking to {limit} forklifts, refused {}", target.id, unit.id);
        return false;
    }

    if target.seize(unit, ForkliftOwner::Pallet(pallet.id), limit) {
        pallet.seized_forklift = Some(unit.id);
        return true;
    }

    false
}

/// Is `unit` still the legitimate, in-use owner of `pallet`'s move?
pub fn continue_moving(pallet: &Pallet, unit: &Forklift) -> bool {
    if !unit.in_use() {
        return false;
    }
    match pallet.seized_forklift {
        None => false,
        Some(f) => f == unit.id && unit.owner() == ForkliftOwner::Pallet(pallet.id),
    }
}
