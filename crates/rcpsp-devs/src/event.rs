//! Ports and messages exchanged between components.
//!
//! Every message is an [`ExternalEvent`]: a [`Port`] name plus a typed
//! [`Payload`].  Messages are values; the coordinator clones one per coupled
//! receiver, so no two components ever share an `Activity` or a `Resource`.

use std::collections::BTreeMap;
use std::fmt;

use rcpsp_data::{Activity, ResourceConstraints, Resources};

/// Canonical port vocabulary.  The same name may be an output on one
/// component and an input on another; the coupling table says which.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Port {
    /// Route an activity to a location.
    Schedule,
    /// Request resources (scheduler → assignment, assignment → pools).
    Demand,
    /// Grant of resources to a scheduler; withdrawal order to a pool.
    Assign,
    /// A demand cannot be met; carries the per-type shortfall.
    Unavailable,
    /// Shortfall reported upstream by a stalled scheduler.
    OutDemand,
    /// Dispatch an activity to the processor.
    Process,
    /// Step or activity completion.
    Done,
    /// Return resources to their pools.
    Release,
    /// Per-type availability reply (pool → assignment).
    Available,
    /// Withdrawn tokens (pool → assignment, assignment → scheduler).
    Granted,
}

impl Port {
    pub fn as_str(self) -> &'static str {
        match self {
            Port::Schedule    => "schedule",
            Port::Demand      => "demand",
            Port::Assign      => "assign",
            Port::Unavailable => "unavailable",
            Port::OutDemand   => "out_demand",
            Port::Process     => "process",
            Port::Done        => "done",
            Port::Release     => "release",
            Port::Available   => "available",
            Port::Granted     => "granted",
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message body.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Payload {
    /// `activity` should run its current step at `location`.  `previous` is
    /// the location it leaves, used for transit-time lookups.
    Schedule {
        location: String,
        previous: Option<String>,
        activity: Activity,
    },
    /// Residual demand of one activity.
    Demand(ResourceConstraints),
    /// Per-type demand or withdrawal order addressed to pools.
    PoolRequest { resource_type: String, quantity: u32 },
    /// Pool reply.  `number` is the requested quantity when `available`,
    /// otherwise `quantity() - requested` (negative: the shortfall).
    Availability { resource_type: String, available: bool, number: i64 },
    Resources(Resources),
    /// Missing tokens per type.
    Shortfall(BTreeMap<String, u32>),
    Activity(Activity),
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Schedule { .. }     => "schedule",
            Payload::Demand(_)           => "demand",
            Payload::PoolRequest { .. }  => "pool-request",
            Payload::Availability { .. } => "availability",
            Payload::Resources(_)        => "resources",
            Payload::Shortfall(_)        => "shortfall",
            Payload::Activity(_)         => "activity",
        }
    }
}

/// A message on a port.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalEvent {
    pub port:    Port,
    pub payload: Payload,
}

impl ExternalEvent {
    pub fn new(port: Port, payload: Payload) -> Self {
        Self { port, payload }
    }

    /// The activity carried by a `Schedule` or `Activity` payload.
    pub fn activity(&self) -> Option<&Activity> {
        match &self.payload {
            Payload::Schedule { activity, .. } | Payload::Activity(activity) => Some(activity),
            _ => None,
        }
    }
}

impl fmt::Display for ExternalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.port)?;
        match &self.payload {
            Payload::Schedule { location, activity, .. } => write!(f, " {activity} -> {location}"),
            Payload::Demand(c) => write!(f, " {c}"),
            Payload::PoolRequest { resource_type, quantity } => {
                write!(f, " {resource_type}:{quantity}")
            }
            Payload::Availability { resource_type, available, number } => {
                write!(f, " {resource_type} available={available} number={number}")
            }
            Payload::Resources(r) => write!(f, " {r}"),
            Payload::Shortfall(m) => write!(f, " {m:?}"),
            Payload::Activity(a) => write!(f, " {a}"),
        }
    }
}
