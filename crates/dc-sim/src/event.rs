//! Timed events driving the simulation.

use dc_core::{DockId, ForkliftId, HandlerId, PalletId, TruckId};

use crate::gates::LaneDirection;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lane {
    Load,
    Unload,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Generate a random order, then re-arm.
    OrderTimer,
    /// Submit the scripted order at this index.
    ScriptedOrder(usize),
    LoadingTruckArrives,
    UnloadingTruckArrives,
    /// Re-evaluate every wait gate, then re-arm.
    GateTick,
    /// A forklift delivered `pallet`; `target` is the handler the move was
    /// counted against.
    MoveFinished { pallet: PalletId, unit: ForkliftId, target: HandlerId },
    /// A dock forklift moved one pallet between the dock and its truck.
    DockStepFinished { dock: DockId, unit: ForkliftId },
    ManeuverFinished { truck: TruckId, lane: Lane, direction: LaneDirection },
}
