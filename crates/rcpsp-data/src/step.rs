//! `Step` — one indivisible phase of an activity.

use rcpsp_core::Time;

use crate::{ResourceConstraints, Resources, TemporalConstraints};

/// A phase with a fixed duration, a location, and a resource requirement.
///
/// The `*_time` fields are run state, set as the step is released, started
/// and finished.  A step is [`done`][Self::done] at exactly
/// `start_time + duration`, never later: the processor must wake at that
/// precise instant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    pub name: String,
    pub duration: Time,
    pub location: String,
    pub resource_constraints: ResourceConstraints,
    pub temporal_constraints: TemporalConstraints,

    pub wait_time: Option<Time>,
    pub start_time: Option<Time>,
    pub finish_time: Option<Time>,
}

impl Step {
    pub fn new(
        name: impl Into<String>,
        duration: Time,
        location: impl Into<String>,
        resource_constraints: ResourceConstraints,
    ) -> Self {
        Self {
            name: name.into(),
            duration,
            location: location.into(),
            resource_constraints,
            temporal_constraints: TemporalConstraints::NONE,
            wait_time: None,
            start_time: None,
            finish_time: None,
        }
    }

    pub fn with_window(mut self, window: TemporalConstraints) -> Self {
        self.temporal_constraints = window;
        self
    }

    pub fn residual(&self, held: &Resources) -> ResourceConstraints {
        self.resource_constraints.residual(held)
    }

    pub fn is_satisfied(&self, held: &Resources) -> bool {
        self.resource_constraints.is_satisfied(held)
    }

    pub fn retains(&self, resource_type: &str) -> bool {
        self.resource_constraints.retains(resource_type)
    }

    pub fn starting(&self, t: Time) -> bool {
        self.temporal_constraints.starting(t)
    }

    pub fn wait(&mut self, t: Time) {
        self.wait_time = Some(t);
    }

    pub fn start(&mut self, t: Time) {
        self.start_time = Some(t);
    }

    /// `t - start_time == duration`.  `false` for a step never started.
    pub fn done(&self, t: Time) -> bool {
        match self.start_time {
            Some(start) => t >= start && t.since(start) == self.duration,
            None => false,
        }
    }

    /// `duration - (t - start_time)`; the full duration if not started.
    pub fn remaining_time(&self, t: Time) -> Time {
        match self.start_time {
            Some(start) => self.duration.saturating_sub(t.since(start)),
            None => self.duration,
        }
    }

    pub fn finish(&mut self, t: Time) {
        self.finish_time = Some(t);
    }
}
