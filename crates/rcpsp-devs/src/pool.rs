//! Pool actor: answers demand / assign / release against one `ResourcePool`.

use rcpsp_core::Time;
use rcpsp_data::ResourcePool;
use tracing::debug;

use crate::{DevsError, Dynamics, ExternalEvent, Observations, Payload, Port};

/// Component wrapping a single [`ResourcePool`].
///
/// Requests for other resource types are ignored: the assignment broadcasts
/// to every pool of its location.  Replies go out at `ta = 0`, in the order
/// the requests arrived.
pub struct PoolActor {
    name:    String,
    initial: ResourcePool,
    pool:    ResourcePool,
    replies: Vec<ExternalEvent>,
}

impl PoolActor {
    pub fn new(name: impl Into<String>, pool: ResourcePool) -> Self {
        Self { name: name.into(), initial: pool.clone(), pool, replies: Vec::new() }
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    fn on_demand(&mut self, resource_type: &str, quantity: u32, t: Time) {
        let have = self.pool.quantity() as i64;
        let want = i64::from(quantity);
        let available = want <= have;
        let number = if available { want } else { have - want };
        debug!(pool = %self.name, time = %t, resource_type, quantity, available, "availability");
        self.replies.push(ExternalEvent::new(
            Port::Available,
            Payload::Availability { resource_type: resource_type.to_string(), available, number },
        ));
    }

    fn on_assign(&mut self, quantity: u32, t: Time) {
        let granted = self.pool.assign(quantity as usize);
        debug!(pool = %self.name, time = %t, granted = %granted, "assign");
        self.replies.push(ExternalEvent::new(Port::Granted, Payload::Resources(granted)));
    }
}

impl Dynamics for PoolActor {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, _t: Time) -> Time {
        self.pool = self.initial.clone();
        self.replies.clear();
        Time::INFINITY
    }

    fn time_advance(&self) -> Time {
        if self.replies.is_empty() { Time::INFINITY } else { Time::ZERO }
    }

    fn output(&self, _t: Time, out: &mut Vec<ExternalEvent>) {
        out.extend(self.replies.iter().cloned());
    }

    fn internal_transition(&mut self, _t: Time) {
        self.replies.clear();
    }

    fn external_transition(&mut self, bag: &[ExternalEvent], t: Time) {
        for event in bag {
            match (event.port, &event.payload) {
                (Port::Demand, Payload::PoolRequest { resource_type, quantity }) => {
                    if resource_type == self.pool.resource_type() {
                        self.on_demand(resource_type, *quantity, t);
                    }
                }
                (Port::Assign, Payload::PoolRequest { resource_type, quantity }) => {
                    if resource_type == self.pool.resource_type() {
                        self.on_assign(*quantity, t);
                    }
                }
                (Port::Release, Payload::Resources(resources)) => {
                    let accepted = self.pool.release(resources.clone());
                    if accepted > 0 {
                        debug!(pool = %self.name, time = %t, accepted, "release");
                    }
                }
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
        obs.insert("quantity", vec![self.pool.quantity().to_string()]);
        obs.insert("available", self.pool.available().names());
        obs
    }
}
