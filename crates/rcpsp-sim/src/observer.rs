//! Simulation observer trait for progress reporting and data collection.

use rcpsp_core::Time;
use rcpsp_devs::ExternalEvent;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] as instants are
/// processed.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — completion printer
///
/// ```rust,ignore
/// struct Completions;
///
/// impl SimObserver for Completions {
///     fn on_output(&mut self, t: Time, component: &str, event: &ExternalEvent) {
///         if component == "project" || event.port == Port::Done {
///             println!("{t}: {component} {event}");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called for every message a component emits, before it is routed.
    /// Messages on uncoupled ports (e.g. `out_demand`) end here.
    fn on_output(&mut self, _t: Time, _component: &str, _event: &ExternalEvent) {}

    /// Called once all transitions of a cycle at `t` are applied.  Zero-time
    /// cascades call this several times with the same `t`.
    fn on_instant_end(&mut self, _t: Time) {}

    /// Called once when the run stops.
    fn on_sim_end(&mut self, _t: Time) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
