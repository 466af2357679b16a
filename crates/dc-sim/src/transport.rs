//! Tasks waiting for a forklift and the forklift-request entry point.

use std::collections::VecDeque;

use dc_core::{ForkliftId, ForkliftLimits};
use dc_resource::{ForkliftTask, choose_forklift_for_dock, choose_forklift_for_move};

use crate::WarehouseState;
use crate::state::handler_in;

/// Pending dock-service and pallet-move requests, oldest first.
#[derive(Clone, Debug, Default)]
pub struct TransportQueue {
    pending: VecDeque<ForkliftTask>,
}

impl TransportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` unless an identical request is already waiting.
    pub fn request(&mut self, task: ForkliftTask) -> bool {
        if self.pending.contains(&task) {
            return false;
        }
        self.pending.push_back(task);
        true
    }

    pub fn get(&self, index: usize) -> Option<ForkliftTask> {
        self.pending.get(index).copied()
    }

    pub fn remove(&mut self, index: usize) -> Option<ForkliftTask> {
        self.pending.remove(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForkliftTask> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Offer `unit` for `task` under the current `limits`.
///
/// Dock service counts against the dock with `limits.dock_service`; a
/// pallet move counts against its target handler with `limits.pallet_move`.
/// Unknown docks, pallets, or forklifts are refused.
pub fn on_forklift_request(
    state:  &mut WarehouseState,
    task:   ForkliftTask,
    unit:   ForkliftId,
    limits: ForkliftLimits,
) -> bool {
    let WarehouseState { docks, standby, pallets, forklifts, .. } = state;
    let Some(forklift) = forklifts.get_mut(unit) else {
        return false;
    };
    match task {
        ForkliftTask::DockService(d) => match docks.get_mut(d.index()) {
            Some(dock) => choose_forklift_for_dock(dock, forklift, limits.dock_service),
            None => false,
        },
        ForkliftTask::PalletMove { pallet, target } => {
            let Some(pallet) = pallets.get_mut(pallet) else {
                return false;
            };
            match handler_in(docks, standby, target) {
                Some(handler) => choose_forklift_for_move(pallet, forklift, limits.pallet_move, handler),
                None => false,
            }
        }
    }
}
