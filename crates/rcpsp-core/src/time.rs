//! Simulation time model.
//!
//! # Design
//!
//! A single integer type, `Time`, carries both absolute simulation dates and
//! deltas (step durations, transit durations, time-advance values).  Integer
//! units keep all schedule arithmetic exact, which matters here: a step is
//! complete only when `t - start == duration` holds *exactly*.
//!
//! `Time::INFINITY` is the distinguished "no next event" value returned by
//! passive components.  Addition saturates at infinity so `now + INFINITY`
//! stays infinite instead of wrapping.

use std::fmt;

// ── Time ─────────────────────────────────────────────────────────────────────

/// An absolute simulation date or a non-negative delta.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(pub u64);

impl Time {
    pub const ZERO: Time = Time(0);

    /// Sentinel for "never": the time advance of a passive component.
    pub const INFINITY: Time = Time(u64::MAX);

    #[inline]
    pub fn is_infinite(self) -> bool {
        self == Time::INFINITY
    }

    /// Time elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics if `earlier > self`: simulated time never runs backwards.
    #[inline]
    pub fn since(self, earlier: Time) -> Time {
        match self.0.checked_sub(earlier.0) {
            Some(d) => Time(d),
            None => panic!("time went backwards: {earlier} is after {self}"),
        }
    }

    /// `self - other`, clamped at zero.
    #[inline]
    pub fn saturating_sub(self, other: Time) -> Time {
        if self.is_infinite() {
            return Time::INFINITY;
        }
        Time(self.0.saturating_sub(other.0))
    }
}

impl std::ops::Add for Time {
    type Output = Time;
    #[inline]
    fn add(self, rhs: Time) -> Time {
        Time(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::Sub for Time {
    type Output = Time;
    #[inline]
    fn sub(self, rhs: Time) -> Time {
        self.since(rhs)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            f.write_str("inf")
        } else {
            write!(f, "t{}", self.0)
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded alongside the problem definition by the application crate
/// and passed to the simulation runner.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Stop once the clock would pass this date.  `None` runs until every
    /// component is passive.
    pub end_time: Option<Time>,

    /// Master seed for generated problem instances; see `SimRng::new`.
    pub seed: u64,
}

impl SimConfig {
    /// The date at which the run stops (exclusive).  Infinite when unbounded.
    #[inline]
    pub fn end_time(&self) -> Time {
        self.end_time.unwrap_or(Time::INFINITY)
    }
}
