//! Assignment (arbiter): turns one scheduler demand into an all-or-nothing
//! grant from the location's pools.
//!
//! # Protocol
//!
//! ```text
//! WaitDemand ─demand─▶ SendDemand ─▶ WaitAvailable ─all replied─┬─▶ SendAssign ─▶ WaitGrant ─▶ SendGrant ─┐
//!      ▲                                                         └─▶ SendUnavailable ────────────────────┤
//!      └─────────────────────────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Availability is collected for every requested type before any token is
//! withdrawn, so a demand that cannot be met in full never leaves a partial
//! withdrawal behind.  Releases bypass the state machine: they are forwarded
//! to every pool at `ta = 0` and each pool keeps the tokens of its own type.
//! Released tokens of a type no local pool serves are lost; they are counted
//! in the `dropped` observation.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rcpsp_core::Time;
use rcpsp_data::{ResourceConstraints, Resources};
use tracing::{debug, warn};

use crate::{DevsError, Dynamics, ExternalEvent, Observations, Payload, Port};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    WaitDemand,
    SendDemand,
    WaitAvailable,
    SendAssign,
    WaitGrant,
    SendGrant,
    SendUnavailable,
}

impl Phase {
    fn as_str(self) -> &'static str {
        match self {
            Phase::WaitDemand      => "wait_demand",
            Phase::SendDemand      => "send_demand",
            Phase::WaitAvailable   => "wait_available",
            Phase::SendAssign      => "send_assign",
            Phase::WaitGrant       => "wait_grant",
            Phase::SendGrant       => "send_grant",
            Phase::SendUnavailable => "send_unavailable",
        }
    }

    fn is_send(self) -> bool {
        matches!(
            self,
            Phase::SendDemand | Phase::SendAssign | Phase::SendGrant | Phase::SendUnavailable
        )
    }
}

pub struct Assignment {
    name:        String,
    /// Resource types some local pool serves.
    known_types: BTreeSet<String>,

    phase:       Phase,
    /// Demand being served, per type (positive quantities only).
    requested:   BTreeMap<String, u32>,
    /// Demands that arrived while another was in progress.
    pending:     VecDeque<ResourceConstraints>,
    /// Types whose pool has replied.
    replied:     BTreeSet<String>,
    available_count: u32,
    shortfall:   BTreeMap<String, u32>,
    granted:     Resources,
    releases:    Vec<Resources>,
    /// Released tokens no local pool could take back.
    dropped:     usize,
}

impl Assignment {
    pub fn new<I, S>(name: impl Into<String>, known_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name:            name.into(),
            known_types:     known_types.into_iter().map(Into::into).collect(),
            phase:           Phase::WaitDemand,
            requested:       BTreeMap::new(),
            pending:         VecDeque::new(),
            replied:         BTreeSet::new(),
            available_count: 0,
            shortfall:       BTreeMap::new(),
            granted:         Resources::new(),
            releases:        Vec::new(),
            dropped:         0,
        }
    }

    fn total_requested(&self) -> u32 {
        self.requested.values().sum()
    }

    /// Begin serving `demand`.  Types no local pool serves are short by
    /// their full quantity without asking anyone.
    fn start(&mut self, demand: ResourceConstraints, t: Time) {
        self.requested.clear();
        self.replied.clear();
        self.shortfall.clear();
        self.available_count = 0;
        self.granted = Resources::new();

        for resource_type in demand.types() {
            let quantity = demand.quantity_of(resource_type);
            if quantity > 0 {
                self.requested.insert(resource_type.to_string(), quantity);
            }
        }
        for (resource_type, &quantity) in &self.requested {
            if !self.known_types.contains(resource_type) {
                self.shortfall.insert(resource_type.clone(), quantity);
            }
        }

        debug!(assignment = %self.name, time = %t, demand = %demand, "demand");
        self.phase = if !self.shortfall.is_empty() {
            Phase::SendUnavailable
        } else if self.requested.is_empty() {
            Phase::SendGrant
        } else {
            Phase::SendDemand
        };
    }

    fn next_demand(&mut self, t: Time) {
        match self.pending.pop_front() {
            Some(demand) => self.start(demand, t),
            None => self.phase = Phase::WaitDemand,
        }
    }

    fn on_available(&mut self, resource_type: &str, available: bool, number: i64) {
        if !self.requested.contains_key(resource_type) || !self.replied.insert(resource_type.to_string()) {
            return;
        }
        if available {
            self.available_count += u32::try_from(number).unwrap_or(0);
        } else {
            let missing = u32::try_from(-number).unwrap_or(0);
            self.shortfall.insert(resource_type.to_string(), missing);
        }

        if self.replied.len() == self.requested.len() {
            self.phase = if self.shortfall.is_empty() && self.available_count == self.total_requested() {
                Phase::SendAssign
            } else {
                Phase::SendUnavailable
            };
        }
    }

    fn on_release(&mut self, resources: &Resources, t: Time) {
        let orphans = resources
            .iter()
            .filter(|r| !self.known_types.contains(&r.resource_type))
            .count();
        if orphans > 0 {
            warn!(assignment = %self.name, time = %t, released = %resources, orphans, "released tokens have no local pool");
            self.dropped += orphans;
        }
        if !resources.is_empty() {
            self.releases.push(resources.clone());
        }
    }

    fn out_of_phase(&self, port: Port) -> DevsError {
        DevsError::OutOfPhase { component: self.name.clone(), port, phase: self.phase.as_str() }
    }
}

impl Dynamics for Assignment {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, _t: Time) -> Time {
        self.phase = Phase::WaitDemand;
        self.requested.clear();
        self.pending.clear();
        self.replied.clear();
        self.available_count = 0;
        self.shortfall.clear();
        self.granted = Resources::new();
        self.releases.clear();
        self.dropped = 0;
        Time::INFINITY
    }

    fn time_advance(&self) -> Time {
        if self.phase.is_send() || !self.releases.is_empty() {
            Time::ZERO
        } else {
            Time::INFINITY
        }
    }

    fn output(&self, _t: Time, out: &mut Vec<ExternalEvent>) {
        for released in &self.releases {
            out.push(ExternalEvent::new(Port::Release, Payload::Resources(released.clone())));
        }
        match self.phase {
            Phase::SendDemand => {
                for (resource_type, &quantity) in &self.requested {
                    out.push(ExternalEvent::new(
                        Port::Demand,
                        Payload::PoolRequest { resource_type: resource_type.clone(), quantity },
                    ));
                }
            }
            Phase::SendAssign => {
                for (resource_type, &quantity) in &self.requested {
                    out.push(ExternalEvent::new(
                        Port::Assign,
                        Payload::PoolRequest { resource_type: resource_type.clone(), quantity },
                    ));
                }
            }
            Phase::SendGrant => {
                out.push(ExternalEvent::new(Port::Granted, Payload::Resources(self.granted.clone())));
            }
            Phase::SendUnavailable => {
                out.push(ExternalEvent::new(
                    Port::Unavailable,
                    Payload::Shortfall(self.shortfall.clone()),
                ));
            }
            Phase::WaitDemand | Phase::WaitAvailable | Phase::WaitGrant => {}
        }
    }

    fn internal_transition(&mut self, t: Time) {
        self.releases.clear();
        match self.phase {
            Phase::SendDemand => self.phase = Phase::WaitAvailable,
            Phase::SendAssign => self.phase = Phase::WaitGrant,
            Phase::SendGrant => {
                debug!(assignment = %self.name, time = %t, granted = %self.granted, "granted");
                self.next_demand(t);
            }
            Phase::SendUnavailable => {
                debug!(assignment = %self.name, time = %t, shortfall = ?self.shortfall, "unavailable");
                self.next_demand(t);
            }
            Phase::WaitDemand | Phase::WaitAvailable | Phase::WaitGrant => {}
        }
    }

    fn external_transition(&mut self, bag: &[ExternalEvent], t: Time) {
        for event in bag {
            match (event.port, &event.payload) {
                (Port::Demand, Payload::Demand(demand)) => {
                    if self.phase == Phase::WaitDemand {
                        self.start(demand.clone(), t);
                    } else {
                        self.pending.push_back(demand.clone());
                    }
                }
                (Port::Available, Payload::Availability { resource_type, available, number }) => {
                    if self.phase == Phase::WaitAvailable {
                        self.on_available(resource_type, *available, *number);
                    } else {
                        self.out_of_phase(Port::Available).drop_message();
                    }
                }
                (Port::Granted, Payload::Resources(resources)) => {
                    if self.phase == Phase::WaitGrant {
                        self.granted.append(resources.clone());
                        if self.granted.len() as u32 >= self.total_requested() {
                            self.phase = Phase::SendGrant;
                        }
                    } else {
                        self.out_of_phase(Port::Granted).drop_message();
                    }
                }
                (Port::Release, Payload::Resources(resources)) => self.on_release(resources, t),
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
        obs.insert("pending", vec![self.pending.len().to_string()]);
        obs.insert("dropped", vec![self.dropped.to_string()]);
        obs
    }
}
