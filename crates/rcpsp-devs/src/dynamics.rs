//! The `Dynamics` trait — the atomic-component contract driven by the
//! coordinator.

use std::collections::BTreeMap;

use rcpsp_core::Time;

use crate::ExternalEvent;

/// Named observation values, for tracing and tests.
pub type Observations = BTreeMap<&'static str, Vec<String>>;

/// A discrete-event atomic component.
///
/// The coordinator calls, per simulated instant `t` and per component:
///
/// 1. [`output`][Self::output] if the component is imminent (its next event
///    date equals `t`);
/// 2. exactly one transition: internal if imminent with no input, external
///    if it received input but is not imminent, confluent if both;
/// 3. [`time_advance`][Self::time_advance] to compute the next event date as
///    `t + time_advance()`.
///
/// `time_advance` is relative to the last transition.  Components that wait
/// indefinitely return [`Time::INFINITY`].
///
/// # Required methods
///
/// Everything except [`confluent_transition`][Self::confluent_transition]
/// (internal first, then external) and [`observations`][Self::observations].
pub trait Dynamics: Send {
    fn name(&self) -> &str;

    /// Reset to the initial state at date `t`.  Returns the first time
    /// advance.
    fn init(&mut self, t: Time) -> Time;

    fn time_advance(&self) -> Time;

    /// Emit messages for the pending internal event.  Must not change state.
    fn output(&self, t: Time, out: &mut Vec<ExternalEvent>);

    fn internal_transition(&mut self, t: Time);

    /// Handle every message received at `t`, in receipt order.
    fn external_transition(&mut self, bag: &[ExternalEvent], t: Time);

    fn confluent_transition(&mut self, bag: &[ExternalEvent], t: Time) {
        self.internal_transition(t);
        self.external_transition(bag, t);
    }

    /// Current observable state.  Default: nothing to report.
    fn observations(&self) -> Observations {
        Observations::new()
    }
}
