//! The `Sim` coordinator and its event loop.

use rcpsp_core::{ComponentId, SimConfig, Time};
use rcpsp_devs::{Dynamics, ExternalEvent, Observations, Port};
use tracing::trace;

use crate::{SimError, SimObserver, SimResult};

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

/// Default bound on zero-time cycles at one date before `run` gives up.
pub const MAX_CYCLES_PER_INSTANT: usize = 1_000_000;

struct Slot {
    model: Box<dyn Dynamics>,
    /// Date of the next internal event.
    next:  Time,
}

/// Flat discrete-event coordinator over a set of components.
///
/// Each cycle at `t = min(next)`:
///
/// 1. every imminent component emits its output, in insertion order;
/// 2. each message is copied to every `(target, in-port)` coupled to its
///    `(source, out-port)`;
/// 3. every component that is imminent or received input transitions:
///    confluent (internal, then external) when both, otherwise the one that
///    applies;
/// 4. `next = t + time_advance()` for every component that transitioned.
///
/// Build one by hand with [`add`][Self::add] / [`couple`][Self::couple], or
/// from a configuration with [`NetworkBuilder`][crate::NetworkBuilder].
pub struct Sim {
    pub config: SimConfig,
    slots:      Vec<Slot>,
    by_name:    Map<String, ComponentId>,
    couplings:  Map<(ComponentId, Port), Vec<(ComponentId, Port)>>,
    now:        Time,
    started:    bool,
    cycle_limit: usize,
}

impl Sim {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            slots: Vec::new(),
            by_name: Map::default(),
            couplings: Map::default(),
            now: Time::ZERO,
            started: false,
            cycle_limit: MAX_CYCLES_PER_INSTANT,
        }
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Register a component.  Names must be unique.
    pub fn add(&mut self, model: Box<dyn Dynamics>) -> SimResult<ComponentId> {
        let name = model.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(SimError::DuplicateComponent(name));
        }
        let id = ComponentId::try_from(self.slots.len())
            .map_err(|_| SimError::Config("too many components".into()))?;
        self.slots.push(Slot { model, next: Time::INFINITY });
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Route `from`'s `out_port` messages to `to`'s `in_port`.
    pub fn couple(&mut self, from: ComponentId, out_port: Port, to: ComponentId, in_port: Port) {
        self.couplings.entry((from, out_port)).or_default().push((to, in_port));
    }

    /// Bound the number of cycles `run` accepts at a single date.
    pub fn set_cycle_limit(&mut self, cycles: usize) {
        self.cycle_limit = cycles;
    }

    // ── Inspection ────────────────────────────────────────────────────────

    pub fn now(&self) -> Time {
        self.now
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn id(&self, name: &str) -> Option<ComponentId> {
        self.by_name.get(name).copied()
    }

    pub fn component(&self, id: ComponentId) -> &dyn Dynamics {
        self.slots[id.index()].model.as_ref()
    }

    /// Observations of the component called `name`.
    pub fn observations(&self, name: &str) -> Option<Observations> {
        self.id(name).map(|id| self.component(id).observations())
    }

    /// Date of the next event anywhere; infinite when every component is
    /// passive.
    pub fn next_event_time(&self) -> Time {
        self.slots.iter().map(|s| s.next).min().unwrap_or(Time::INFINITY)
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Initialize every component at `t`.  Called by `step`/`run` on first
    /// use; call it explicitly to restart a run.
    pub fn init(&mut self, t: Time) {
        for slot in &mut self.slots {
            slot.next = t + slot.model.init(t);
        }
        self.now = t;
        self.started = true;
    }

    /// Run until every component is passive or the end date is reached.
    /// Returns the date of the last processed cycle.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Time> {
        let mut cycles_at_now = 0usize;
        let mut last_t = None;
        while let Some(t) = self.step(observer)? {
            if last_t == Some(t) {
                cycles_at_now += 1;
                if cycles_at_now >= self.cycle_limit {
                    return Err(SimError::ZeroTimeLoop { time: t, cycles: cycles_at_now });
                }
            } else {
                cycles_at_now = 0;
                last_t = Some(t);
            }
        }
        observer.on_sim_end(self.now);
        Ok(self.now)
    }

    /// Process exactly one cycle.  Returns its date, or `None` when nothing
    /// is left to do before the end date.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Option<Time>> {
        if !self.started {
            self.init(Time::ZERO);
        }
        let t = self.next_event_time();
        if t.is_infinite() || t >= self.config.end_time() {
            return Ok(None);
        }

        // ── Outputs of imminent components, routed to inboxes ─────────────
        let mut inboxes: Vec<Vec<ExternalEvent>> = vec![Vec::new(); self.slots.len()];
        let mut out = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.next != t {
                continue;
            }
            out.clear();
            slot.model.output(t, &mut out);
            let source = ComponentId(i as u32);
            for event in out.drain(..) {
                observer.on_output(t, slot.model.name(), &event);
                match self.couplings.get(&(source, event.port)) {
                    Some(targets) => {
                        for &(target, port) in targets {
                            inboxes[target.index()]
                                .push(ExternalEvent::new(port, event.payload.clone()));
                        }
                    }
                    None => trace!(component = slot.model.name(), port = %event.port, "uncoupled output"),
                }
            }
        }

        // ── Transitions ───────────────────────────────────────────────────
        for (slot, bag) in self.slots.iter_mut().zip(inboxes) {
            let imminent = slot.next == t;
            match (imminent, bag.is_empty()) {
                (false, true) => continue,
                (true, true) => slot.model.internal_transition(t),
                (false, false) => slot.model.external_transition(&bag, t),
                (true, false) => slot.model.confluent_transition(&bag, t),
            }
            slot.next = t + slot.model.time_advance();
        }

        self.now = t;
        observer.on_instant_end(t);
        Ok(Some(t))
    }
}
