//! `dc-schedule` — when things happen and who waits.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`event_queue`] | `EventQueue<E>` (`BTreeMap<Tick, Vec<E>>`)              |
//! | [`wait_queue`]  | `WaitQueue<T>` — insertion-ordered blocked entities     |
//! | [`loader`]      | `load_orders_csv`, `load_orders_reader`, `ScriptedOrder` |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                    |
//!
//! The event queue holds timed callbacks; the simulation drains the events
//! due at each tick in the order they were pushed.  Wait queues hold
//! entities blocked on a condition; they are not re-checked on every event
//! but by periodic gate passes, which release qualifying entries in queue
//! order.

pub mod error;
pub mod event_queue;
pub mod loader;
pub mod wait_queue;


pub use error::{ScheduleError, ScheduleResult};
pub use event_queue::EventQueue;
pub use loader::{ScriptedOrder, load_orders_csv, load_orders_reader};
pub use wait_queue::WaitQueue;
