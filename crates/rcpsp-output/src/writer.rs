//! The `OutputWriter` trait implemented by all backend writers.

use crate::{ActivityRow, OutputResult, StepRow};

/// Trait implemented by schedule writers.
///
/// Errors surface through [`ScheduleObserver::take_error`][crate::ScheduleObserver::take_error]
/// when the writer is driven by the observer.
pub trait OutputWriter {
    fn write_step(&mut self, row: &StepRow) -> OutputResult<()>;

    fn write_activity(&mut self, row: &ActivityRow) -> OutputResult<()>;

    /// Flush all underlying handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
