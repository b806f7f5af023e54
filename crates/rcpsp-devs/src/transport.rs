//! Transport: delays activities entering a location by their transit time.

use rcpsp_core::Time;
use rcpsp_data::{Activity, Durations};
use tracing::debug;

use crate::{DevsError, Dynamics, ExternalEvent, Observations, Payload, Port};

struct InTransit {
    out_date: Time,
    previous: Option<String>,
    activity: Activity,
}

/// Holds each activity scheduled to this location until
/// `arrival + transit(previous)`, then forwards it to the local scheduler.
///
/// Out dates are absolute, so an insertion between wakes needs no sigma
/// bookkeeping beyond remembering the date of the last transition.
pub struct Transport {
    name:       String,
    location:   String,
    durations:  Durations,
    in_transit: Vec<InTransit>,
    last:       Time,
}

impl Transport {
    pub fn new(location: impl Into<String>, durations: Durations) -> Self {
        let location = location.into();
        Self {
            name: format!("{location}/transport"),
            location,
            durations,
            in_transit: Vec::new(),
            last: Time::ZERO,
        }
    }

    pub fn in_transit(&self) -> usize {
        self.in_transit.len()
    }

    fn next_out_date(&self) -> Time {
        self.in_transit.iter().map(|e| e.out_date).min().unwrap_or(Time::INFINITY)
    }
}

impl Dynamics for Transport {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, t: Time) -> Time {
        self.in_transit.clear();
        self.last = t;
        Time::INFINITY
    }

    fn time_advance(&self) -> Time {
        self.next_out_date().saturating_sub(self.last)
    }

    fn output(&self, t: Time, out: &mut Vec<ExternalEvent>) {
        for entry in self.in_transit.iter().filter(|e| e.out_date == t) {
            out.push(ExternalEvent::new(
                Port::Schedule,
                Payload::Schedule {
                    location: self.location.clone(),
                    previous: entry.previous.clone(),
                    activity: entry.activity.clone(),
                },
            ));
        }
    }

    fn internal_transition(&mut self, t: Time) {
        self.in_transit.retain(|e| e.out_date != t);
        self.last = t;
    }

    fn external_transition(&mut self, bag: &[ExternalEvent], t: Time) {
        for event in bag {
            match (event.port, &event.payload) {
                (Port::Schedule, Payload::Schedule { location, previous, activity }) => {
                    if *location != self.location {
                        continue;
                    }
                    let transit = self.durations.from_location(previous.as_deref());
                    let out_date = t + transit;
                    debug!(
                        transport = %self.name,
                        time = %t,
                        activity = activity.name(),
                        from = previous.as_deref().unwrap_or("-"),
                        out_date = %out_date,
                        "in transit"
                    );
                    self.in_transit.push(InTransit {
                        out_date,
                        previous: previous.clone(),
                        activity: activity.clone(),
                    });
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
        obs.insert(
            "in_transit",
            self.in_transit.iter().map(|e| e.activity.name().to_string()).collect(),
        );
        obs
    }
}
