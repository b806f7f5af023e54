//! `StepScheduler` — the per-location coordination protocol.
//!
//! # Phases
//!
//! | Phase           | ta   | Output                                  |
//! |-----------------|------|-----------------------------------------|
//! | `WaitSchedule`  | inf  | (idle, queue empty)                     |
//! | `WaitAssign`    | inf  | (a demand is in flight)                 |
//! | `WaitResource`  | inf  | (head refused, waiting for a release)   |
//! | `SendDemand`    | 0    | `demand` for the selected activity      |
//! | `SendOutDemand` | 0    | `out_demand` with the last shortfall    |
//! | `SendProcess`   | 0    | `process` with the running activity     |
//! | `SendRelease`   | 0    | one `release` per finished step         |
//! | `SendDone`      | 0    | `done` per finished activity            |
//! | `SendSchedule`  | 0    | `schedule` per activity leaving         |
//!
//! At most one demand is in flight per scheduler, and its grant goes to the
//! activity that asked, found by name (the queue may have changed since).
//! A `done` that arrives during a send phase is queued and handled once the
//! send completes; a grant or refusal that arrives then is applied to the
//! queue immediately and acted on at the next `SendDemand`.
//!
//! An activity whose next step stays at this location goes back to the
//! *front* of the queue: it may hold retained tokens that the head of the
//! queue is waiting for.
//!
//! Tokens released while a demand is in flight may reach the pools after
//! they have already answered it.  A refusal of that demand is therefore not
//! final: the scheduler asks again from the head of the queue.

use std::collections::BTreeMap;

use rcpsp_core::Time;
use rcpsp_data::{Activity, Resources, WaitingActivities};
use tracing::{debug, warn};

use crate::{DevsError, Dynamics, ExternalEvent, Observations, Payload, Port, SchedulingPolicy};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SchedulerPhase {
    WaitSchedule,
    WaitAssign,
    WaitResource,
    SendDemand,
    SendOutDemand,
    SendProcess,
    SendRelease,
    SendDone,
    SendSchedule,
}

impl SchedulerPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SchedulerPhase::WaitSchedule  => "wait_schedule",
            SchedulerPhase::WaitAssign    => "wait_assign",
            SchedulerPhase::WaitResource  => "wait_resource",
            SchedulerPhase::SendDemand    => "send_demand",
            SchedulerPhase::SendOutDemand => "send_out_demand",
            SchedulerPhase::SendProcess   => "send_process",
            SchedulerPhase::SendRelease   => "send_release",
            SchedulerPhase::SendDone      => "send_done",
            SchedulerPhase::SendSchedule  => "send_schedule",
        }
    }

    pub fn is_wait(self) -> bool {
        matches!(
            self,
            SchedulerPhase::WaitSchedule | SchedulerPhase::WaitAssign | SchedulerPhase::WaitResource
        )
    }
}

pub struct StepScheduler {
    name:     String,
    location: String,
    policy:   Box<dyn SchedulingPolicy>,
    phase:    SchedulerPhase,

    waiting:  WaitingActivities,
    /// Activity being handed to the processor.
    running:  Option<Activity>,
    /// Activities whose step just finished, resources not yet released.
    released: Vec<Activity>,
    /// Finished activities to report upstream.
    done:     Vec<Activity>,
    /// Activities leaving for another location.
    outgoing: Vec<Activity>,

    /// Activity whose demand is in flight.
    demanding: Option<String>,
    /// Tokens went back to the pools after the in-flight demand was sent.
    released_in_flight: bool,
    shortfall: BTreeMap<String, u32>,
}

impl StepScheduler {
    pub fn new(location: impl Into<String>, policy: Box<dyn SchedulingPolicy>) -> Self {
        let location = location.into();
        Self {
            name: format!("{location}/scheduler"),
            location,
            policy,
            phase: SchedulerPhase::WaitSchedule,
            waiting: WaitingActivities::new(),
            running: None,
            released: Vec::new(),
            done: Vec::new(),
            outgoing: Vec::new(),
            demanding: None,
            released_in_flight: false,
            shortfall: BTreeMap::new(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn waiting(&self) -> &WaitingActivities {
        &self.waiting
    }

    fn enqueue(&mut self, mut activity: Activity, t: Time) {
        activity.wait(t);
        self.waiting.push_back(activity);
        self.policy.add(&self.waiting, self.waiting.len() - 1);
    }

    /// Queue the next step of an activity that just finished one here.
    fn continue_here(&mut self, mut activity: Activity, t: Time) {
        activity.wait(t);
        self.waiting.push_front(activity);
        self.policy.add(&self.waiting, 0);
    }

    /// Take the activity at `index` out of the queue for dispatch.
    fn dispatch(&mut self, index: usize) {
        self.running = self.waiting.remove(index);
        self.policy.remove(index);
        self.phase = SchedulerPhase::SendProcess;
    }

    /// Pick the next phase once a send phase has completed.
    fn resume(&mut self) {
        self.phase = if self.demanding.is_some() {
            SchedulerPhase::WaitAssign
        } else if !self.released.is_empty() {
            SchedulerPhase::SendRelease
        } else if !self.waiting.is_empty() {
            self.policy.reset();
            SchedulerPhase::SendDemand
        } else {
            SchedulerPhase::WaitSchedule
        };
    }

    fn on_schedule(&mut self, location: &str, activity: &Activity, t: Time) {
        if location != self.location {
            return;
        }
        if activity.is_end() {
            warn!(location = %self.location, time = %t, activity = activity.name(), "finished activity scheduled; dropped");
            return;
        }
        debug!(location = %self.location, time = %t, activity = activity.name(), "schedule in");
        self.enqueue(activity.clone(), t);
        match self.phase {
            SchedulerPhase::WaitSchedule => {
                self.policy.reset();
                self.phase = SchedulerPhase::SendDemand;
            }
            SchedulerPhase::WaitResource if self.policy.another(&self.waiting) => {
                self.policy.next(&self.waiting);
                self.phase = SchedulerPhase::SendDemand;
            }
            _ => {}
        }
    }

    fn on_assign(&mut self, granted: &Resources, t: Time) {
        self.released_in_flight = false;
        let Some(name) = self.demanding.take() else {
            DevsError::OutOfPhase {
                component: self.name.clone(),
                port: Port::Assign,
                phase: self.phase.as_str(),
            }
            .drop_message();
            return;
        };
        let Some(index) = self.waiting.position(&name) else {
            warn!(location = %self.location, time = %t, activity = %name, "grant for an activity no longer waiting");
            return;
        };
        let satisfied = match self.waiting.get_mut(index) {
            Some(activity) => {
                activity.assign(granted.clone());
                debug!(location = %self.location, time = %t, activity = %activity, "assign");
                activity.check_resource_constraint()
            }
            None => false,
        };

        if self.phase == SchedulerPhase::WaitAssign {
            if satisfied {
                self.dispatch(index);
            } else {
                self.phase = SchedulerPhase::SendDemand;
            }
        }
    }

    fn on_unavailable(&mut self, shortfall: &BTreeMap<String, u32>, t: Time) {
        if self.demanding.take().is_none() {
            DevsError::OutOfPhase {
                component: self.name.clone(),
                port: Port::Unavailable,
                phase: self.phase.as_str(),
            }
            .drop_message();
            return;
        }
        let retry = std::mem::take(&mut self.released_in_flight);
        self.shortfall = shortfall.clone();
        debug!(location = %self.location, time = %t, shortfall = ?self.shortfall, retry, "unavailable");

        if self.phase != SchedulerPhase::WaitAssign {
            return;
        }
        self.phase = if retry {
            self.policy.reset();
            SchedulerPhase::SendDemand
        } else if self.policy.another(&self.waiting) {
            self.policy.next(&self.waiting);
            SchedulerPhase::SendDemand
        } else if self.policy.demand() {
            SchedulerPhase::SendOutDemand
        } else {
            SchedulerPhase::WaitResource
        };
    }

    fn on_done(&mut self, activity: &Activity, t: Time) {
        debug!(location = %self.location, time = %t, activity = %activity, "done in");
        self.released.push(activity.clone());
        if self.phase.is_wait() {
            self.phase = SchedulerPhase::SendRelease;
        }
    }

    fn release_finished(&mut self, t: Time) {
        for mut activity in std::mem::take(&mut self.released) {
            let freed = activity.release();
            debug!(location = %self.location, time = %t, activity = activity.name(), freed = %freed, "release");
            if self.demanding.is_some() && !freed.is_empty() {
                self.released_in_flight = true;
            }
            if activity.is_end() {
                self.done.push(activity);
            } else if activity.location() == Some(self.location.as_str()) {
                self.continue_here(activity, t);
            } else {
                self.outgoing.push(activity);
            }
        }
    }
}

impl Dynamics for StepScheduler {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, _t: Time) -> Time {
        self.phase = SchedulerPhase::WaitSchedule;
        self.waiting = WaitingActivities::new();
        self.running = None;
        self.released.clear();
        self.done.clear();
        self.outgoing.clear();
        self.demanding = None;
        self.released_in_flight = false;
        self.shortfall.clear();
        self.policy.reset();
        Time::INFINITY
    }

    fn time_advance(&self) -> Time {
        if self.phase.is_wait() { Time::INFINITY } else { Time::ZERO }
    }

    fn output(&self, _t: Time, out: &mut Vec<ExternalEvent>) {
        match self.phase {
            SchedulerPhase::SendDemand => {
                let selected = self.policy.select(&self.waiting).and_then(|i| self.waiting.get(i));
                if let Some(activity) = selected {
                    let residual = activity.residual_constraints();
                    if !residual.is_empty() {
                        out.push(ExternalEvent::new(Port::Demand, Payload::Demand(residual)));
                    }
                }
            }
            SchedulerPhase::SendOutDemand => {
                out.push(ExternalEvent::new(Port::OutDemand, Payload::Shortfall(self.shortfall.clone())));
            }
            SchedulerPhase::SendProcess => {
                if let Some(activity) = &self.running {
                    out.push(ExternalEvent::new(Port::Process, Payload::Activity(activity.clone())));
                }
            }
            SchedulerPhase::SendRelease => {
                for activity in &self.released {
                    let freed = activity.released_resources();
                    if !freed.is_empty() {
                        out.push(ExternalEvent::new(Port::Release, Payload::Resources(freed)));
                    }
                }
            }
            SchedulerPhase::SendDone => {
                for activity in &self.done {
                    out.push(ExternalEvent::new(Port::Done, Payload::Activity(activity.clone())));
                }
            }
            SchedulerPhase::SendSchedule => {
                for activity in &self.outgoing {
                    if let Some(location) = activity.location() {
                        out.push(ExternalEvent::new(
                            Port::Schedule,
                            Payload::Schedule {
                                location: location.to_string(),
                                previous: Some(self.location.clone()),
                                activity: activity.clone(),
                            },
                        ));
                    }
                }
            }
            SchedulerPhase::WaitSchedule | SchedulerPhase::WaitAssign | SchedulerPhase::WaitResource => {}
        }
    }

    fn internal_transition(&mut self, t: Time) {
        match self.phase {
            SchedulerPhase::SendDemand => match self.policy.select(&self.waiting) {
                None => {
                    self.phase = if self.waiting.is_empty() {
                        SchedulerPhase::WaitSchedule
                    } else {
                        SchedulerPhase::WaitResource
                    };
                }
                Some(index) => match self.waiting.get(index) {
                    Some(a) if !a.residual_constraints().is_empty() => {
                        self.demanding = Some(a.name().to_string());
                        self.released_in_flight = false;
                        self.phase = SchedulerPhase::WaitAssign;
                    }
                    _ => self.dispatch(index),
                },
            },
            SchedulerPhase::SendOutDemand => {
                warn!(location = %self.location, time = %t, shortfall = ?self.shortfall, "stalled on resources");
                self.phase = if self.released.is_empty() {
                    SchedulerPhase::WaitResource
                } else {
                    SchedulerPhase::SendRelease
                };
            }
            SchedulerPhase::SendProcess => {
                if let Some(activity) = self.running.take() {
                    debug!(location = %self.location, time = %t, activity = %activity, "process");
                }
                self.resume();
            }
            SchedulerPhase::SendRelease => {
                self.release_finished(t);
                if !self.done.is_empty() {
                    self.phase = SchedulerPhase::SendDone;
                } else if !self.outgoing.is_empty() {
                    self.phase = SchedulerPhase::SendSchedule;
                } else {
                    self.resume();
                }
            }
            SchedulerPhase::SendDone => {
                for activity in self.done.drain(..) {
                    debug!(location = %self.location, time = %t, activity = activity.name(), "done out");
                }
                if self.outgoing.is_empty() {
                    self.resume();
                } else {
                    self.phase = SchedulerPhase::SendSchedule;
                }
            }
            SchedulerPhase::SendSchedule => {
                for activity in self.outgoing.drain(..) {
                    if !activity.allocated_resources().is_empty() {
                        warn!(
                            location = %self.location,
                            time = %t,
                            activity = activity.name(),
                            held = %activity.allocated_resources(),
                            "activity leaves holding retained tokens"
                        );
                    }
                    debug!(
                        location = %self.location,
                        time = %t,
                        activity = activity.name(),
                        to = activity.location().unwrap_or("-"),
                        "schedule out"
                    );
                }
                self.resume();
            }
            SchedulerPhase::WaitSchedule | SchedulerPhase::WaitAssign | SchedulerPhase::WaitResource => {}
        }
    }

    fn external_transition(&mut self, bag: &[ExternalEvent], t: Time) {
        for event in bag {
            match (event.port, &event.payload) {
                (Port::Schedule, Payload::Schedule { location, activity, .. }) => {
                    self.on_schedule(location, activity, t);
                }
                (Port::Assign, Payload::Resources(granted)) => self.on_assign(granted, t),
                (Port::Unavailable, Payload::Shortfall(shortfall)) => self.on_unavailable(shortfall, t),
                (Port::Done, Payload::Activity(activity)) => self.on_done(activity, t),
                (port, payload) => DevsError::Malformed {
                    component: self.name.clone(),
                    port,
                    payload: payload.kind(),
                }
                .drop_message(),
            }
        }
    }

    fn observations(&self) -> Observations {
        let mut obs = Observations::new();
        obs.insert("phase", vec![self.phase.as_str().to_string()]);
        obs.insert("waiting", self.waiting.names());
        obs.insert("policy", vec![self.policy.name().to_string()]);
        obs
    }
}
