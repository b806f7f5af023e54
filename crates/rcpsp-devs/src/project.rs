//! `ProjectScheduler` — the root that releases a problem's activities into
//! the network and collects them when they finish.

use rcpsp_core::Time;
use rcpsp_data::{Activity, ActivityCollection};
use tracing::{debug, info, warn};

use crate::{DevsError, Dynamics, ExternalEvent, Observations, Payload, Port};

/// Owns every activity not yet released.  At each wake it drops activities
/// whose start window has closed, sends those whose window is open to the
/// location of their first step, and sleeps until the next early start.
pub struct ProjectScheduler {
    name:      String,
    initial:   ActivityCollection,
    pending:   ActivityCollection,
    releasing: Vec<Activity>,
    completed: Vec<Activity>,
    missed:    Vec<Activity>,
    next_wake: Time,
    last:      Time,
    makespan:  Time,
}

impl ProjectScheduler {
    pub fn new(activities: ActivityCollection) -> Self {
        Self {
            name:      "project".to_string(),
            initial:   activities.clone(),
            pending:   activities,
            releasing: Vec::new(),
            completed: Vec::new(),
            missed:    Vec::new(),
            next_wake: Time::INFINITY,
            last:      Time::ZERO,
            makespan:  Time::ZERO,
        }
    }

    pub fn completed(&self) -> &[Activity] {
        &self.completed
    }

    /// Activities dropped because their window closed before release.
    pub fn missed(&self) -> &[Activity] {
        &self.missed
    }

    pub fn pending(&self) -> &ActivityCollection {
        &self.pending
    }

    /// Date of the last completion.
    pub fn makespan(&self) -> Time {
        self.makespan
    }

    fn release_due(&mut self, t: Time) {
        for activity in self.pending.take_missed(t) {
            warn!(time = %t, activity = activity.name(), "start window missed; activity dropped");
            self.missed.push(activity);
        }
        self.releasing = self.pending.take_starting(t);
        for activity in &self.releasing {
            debug!(
                time = %t,
                activity = activity.name(),
                location = activity.location().unwrap_or("-"),
                "release"
            );
        }
    }
}

impl Dynamics for ProjectScheduler {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, t: Time) -> Time {
        self.pending = self.initial.clone();
        self.releasing.clear();
        self.completed.clear();
        self.missed.clear();
        self.makespan = t;
        self.last = t;
        self.next_wake = if self.pending.is_empty() { Time::INFINITY } else { t };
        self.time_advance()
    }

    fn time_advance(&self) -> Time {
        if self.releasing.is_empty() {
            self.next_wake.saturating_sub(self.last)
        } else {
            Time::ZERO
        }
    }

    fn output(&self, _t: Time, out: &mut Vec<ExternalEvent>) {
        for activity in &self.releasing {
            if let Some(location) = activity.location() {
                out.push(ExternalEvent::new(
                    Port::Schedule,
                    Payload::Schedule {
                        location: location.to_string(),
                        previous: None,
                        activity: activity.clone(),
                    },
                ));
            }
        }
    }

    fn internal_transition(&mut self, t: Time) {
        if self.releasing.is_empty() {
            self.release_due(t);
        } else {
            self.releasing.clear();
        }
        let ahead = self.pending.next_start(t);
        self.next_wake = if ahead.is_infinite() { Time::INFINITY } else { t + ahead };
        self.last = t;
    }

    fn external_transition(&mut self, bag: &[ExternalEvent], t: Time) {
        for event in bag {
            match (event.port, &event.payload) {
                (Port::Done, Payload::Activity(activity)) => {
                    info!(time = %t, activity = activity.name(), "activity completed");
                    self.makespan = self.makespan.max(t);
                    self.completed.push(activity.clone());
                }
                (port, payload) => DevsError::Malformed {
                    component: self.name.clone(),
                    port,
                    payload: payload.kind(),
                }
                .drop_message(),
            }
        }
        self.last = t;
    }

    fn observations(&self) -> Observations {
        let mut obs = Observations::new();
        obs.insert("pending", self.pending.names());
        obs.insert("completed", self.completed.iter().map(|a| a.name().to_string()).collect());
        obs.insert("missed", self.missed.iter().map(|a| a.name().to_string()).collect());
        obs.insert("makespan", vec![self.makespan.0.to_string()]);
        obs
    }
}
