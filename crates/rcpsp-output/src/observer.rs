//! `ScheduleObserver<W>` — turns the network's event stream into schedule
//! rows for an `OutputWriter`.

use rcpsp_core::Time;
use rcpsp_data::Activity;
use rcpsp_devs::{ExternalEvent, Payload, Port};
use rcpsp_sim::SimObserver;

use crate::row::{ActivityRow, StepRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records every finished step and every completed
/// activity.
///
/// Steps are read off processor `done` messages (the activity carries the
/// step it just finished); activities off scheduler `done` messages.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct ScheduleObserver<W: OutputWriter> {
    writer:     W,
    steps:      usize,
    activities: usize,
    makespan:   Time,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> ScheduleObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            steps:      0,
            activities: 0,
            makespan:   Time::ZERO,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    pub fn steps_written(&self) -> usize {
        self.steps
    }

    pub fn activities_written(&self) -> usize {
        self.activities
    }

    /// Date of the last activity completion seen.
    pub fn makespan(&self) -> Time {
        self.makespan
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn on_step_done(&mut self, activity: &Activity, t: Time) {
        let Some(step) = activity.last_finished_step() else {
            return;
        };
        let row = StepRow {
            activity: activity.name().to_string(),
            step:     step.name.clone(),
            location: step.location.clone(),
            wait:     step.wait_time.map(|w| w.0),
            start:    step.start_time.unwrap_or(t).0,
            finish:   step.finish_time.unwrap_or(t).0,
        };
        let result = self.writer.write_step(&row);
        self.steps += 1;
        self.store_err(result);
    }

    fn on_activity_done(&mut self, activity: &Activity, t: Time) {
        let start = activity.steps().first().and_then(|s| s.start_time).unwrap_or(t);
        let row = ActivityRow {
            activity: activity.name().to_string(),
            start:    start.0,
            finish:   t.0,
            steps:    activity.steps().len() as u32,
        };
        let result = self.writer.write_activity(&row);
        self.activities += 1;
        self.makespan = self.makespan.max(t);
        self.store_err(result);
    }
}

impl<W: OutputWriter> SimObserver for ScheduleObserver<W> {
    fn on_output(&mut self, t: Time, component: &str, event: &ExternalEvent) {
        let (Port::Done, Payload::Activity(activity)) = (event.port, &event.payload) else {
            return;
        };
        if component.ends_with("/processor") {
            self.on_step_done(activity, t);
        } else if component.ends_with("/scheduler") {
            self.on_activity_done(activity, t);
        }
    }

    fn on_sim_end(&mut self, _t: Time) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
