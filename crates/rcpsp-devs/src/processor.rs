//! Processor: runs activity steps and reports each completion.

use rcpsp_core::Time;
use rcpsp_data::{Activity, ActivityCollection};
use tracing::debug;

use crate::{DevsError, Dynamics, ExternalEvent, Observations, Payload, Port};

/// Runs any number of activities concurrently, each on its own timer.
///
/// The next wake is the smallest remaining time across running steps,
/// recomputed from absolute start dates on every transition, so the wake
/// lands on the exact completion instant whatever arrived in between.  At
/// that instant every step that completes is finished and reported with
/// `ta = 0`.
pub struct Processor {
    name:     String,
    running:  ActivityCollection,
    finished: Vec<Activity>,
    sigma:    Time,
}

impl Processor {
    pub fn new(location: &str) -> Self {
        Self {
            name:     format!("{location}/processor"),
            running:  ActivityCollection::new(),
            finished: Vec::new(),
            sigma:    Time::INFINITY,
        }
    }

    pub fn running(&self) -> &ActivityCollection {
        &self.running
    }

    /// Smallest remaining step time at `t`; infinite when idle.
    fn next_completion(&self, t: Time) -> Time {
        self.running.iter().map(|a| a.remaining_time(t)).min().unwrap_or(Time::INFINITY)
    }

    fn finish_completed(&mut self, t: Time) {
        let mut still_running = Vec::with_capacity(self.running.len());
        for mut activity in self.running.drain() {
            if activity.done(t) {
                activity.finish(t);
                debug!(processor = %self.name, time = %t, activity = activity.name(), "step finished");
                self.finished.push(activity);
            } else {
                still_running.push(activity);
            }
        }
        self.running = still_running.into();
    }
}

impl Dynamics for Processor {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, _t: Time) -> Time {
        self.running = ActivityCollection::new();
        self.finished.clear();
        self.sigma = Time::INFINITY;
        self.sigma
    }

    fn time_advance(&self) -> Time {
        if self.finished.is_empty() { self.sigma } else { Time::ZERO }
    }

    fn output(&self, _t: Time, out: &mut Vec<ExternalEvent>) {
        for activity in &self.finished {
            out.push(ExternalEvent::new(Port::Done, Payload::Activity(activity.clone())));
        }
    }

    fn internal_transition(&mut self, t: Time) {
        if self.finished.is_empty() {
            self.finish_completed(t);
        } else {
            self.finished.clear();
        }
        self.sigma = self.next_completion(t);
    }

    fn external_transition(&mut self, bag: &[ExternalEvent], t: Time) {
        for event in bag {
            match (event.port, &event.payload) {
                (Port::Process, Payload::Activity(activity)) if !activity.is_end() => {
                    let mut activity = activity.clone();
                    activity.start(t);
                    debug!(
                        processor = %self.name,
                        time = %t,
                        activity = activity.name(),
                        step = %activity.current_step().name,
                        "step started"
                    );
                    self.running.push(activity);
                }
                (port, payload) => DevsError::Malformed {
                    component: self.name.clone(),
                    port,
                    payload: payload.kind(),
                }
                .drop_message(),
            }
        }
        self.sigma = self.next_completion(t);
    }

    fn observations(&self) -> Observations {
        let mut obs = Observations::new();
        obs.insert("running", self.running.names());
        obs.insert("steps", self.running.step_names());
        obs.insert("used_resources", self.running.used_resources());
        obs.insert(
            "used_resource_types",
            self.running
                .used_resource_types()
                .into_iter()
                .map(|(t, n)| format!("{t}:{n}"))
                .collect(),
        );
        obs
    }
}
