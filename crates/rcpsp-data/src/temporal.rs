//! Time windows attached to activities and steps.

use rcpsp_core::Time;

/// Optional early/late start and finish dates.
///
/// Only the start window is enforced: [`starting`][Self::starting] holds
/// when `early_start <= t <= late_start`, with a missing bound treated as
/// open.  The finish dates are carried for reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemporalConstraints {
    pub early_start: Option<Time>,
    pub late_start: Option<Time>,
    pub early_finish: Option<Time>,
    pub late_finish: Option<Time>,
}

impl TemporalConstraints {
    /// No window at all: always startable.
    pub const NONE: TemporalConstraints = TemporalConstraints {
        early_start: None,
        late_start: None,
        early_finish: None,
        late_finish: None,
    };

    pub fn start_window(early_start: Option<Time>, late_start: Option<Time>) -> Self {
        Self { early_start, late_start, ..Self::NONE }
    }

    pub fn has_start_window(&self) -> bool {
        self.early_start.is_some() || self.late_start.is_some()
    }

    pub fn starting(&self, t: Time) -> bool {
        if !self.has_start_window() {
            return true;
        }
        let es = self.early_start.unwrap_or(Time::ZERO);
        let ls = self.late_start.unwrap_or(Time::INFINITY);
        es <= t && t <= ls
    }

    /// `true` once `t` is past the late start: the window can never open again.
    pub fn closed(&self, t: Time) -> bool {
        matches!(self.late_start, Some(ls) if t > ls)
    }
}
