//! Simulation time.
//!
//! Every duration in the warehouse (pallet moves, dock steps, truck
//! manoeuvres, order cadence) is a whole number of ticks, so the event queue
//! orders integers only.  `SimClock` pins tick 0 to a Unix timestamp for
//! output rows and log lines; the default resolution is one minute per tick.

use std::fmt;
use std::ops::Add;

/// An absolute point on the simulation timeline.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks from `earlier` to `self`; zero when `earlier` is not earlier.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Snapshot cadence test.  An interval of 0 never matches.
    #[inline]
    pub fn is_multiple_of(self, interval: u64) -> bool {
        interval != 0 && self.0 % interval == 0
    }
}

impl Add<u64> for Tick {
    type Output = Tick;

    #[inline]
    fn add(self, delay: u64) -> Tick {
        Tick(self.0 + delay)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// The running tick plus its mapping to wall-clock time.
///
/// Displays as `T90 (day 0 01:30)`, the prefix every simulation log line
/// carries.
#[derive(Clone, Debug)]
pub struct SimClock {
    pub start_unix_secs:    i64,
    pub tick_duration_secs: u32,
    pub current_tick:       Tick,
}

impl SimClock {
    pub fn new(start_unix_secs: i64, tick_duration_secs: u32) -> Self {
        Self { start_unix_secs, tick_duration_secs, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Unix timestamp at which `tick` begins.
    #[inline]
    pub fn unix_secs_at(&self, tick: Tick) -> i64 {
        self.start_unix_secs + self.secs_between(Tick::ZERO, tick)
    }

    fn secs_between(&self, from: Tick, to: Tick) -> i64 {
        to.since(from) as i64 * i64::from(self.tick_duration_secs)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.secs_between(Tick::ZERO, self.current_tick);
        let (day, rest) = (secs / 86_400, secs % 86_400);
        write!(f, "{} (day {day} {:02}:{:02})", self.current_tick, rest / 3_600, rest % 3_600 / 60)
    }
}
