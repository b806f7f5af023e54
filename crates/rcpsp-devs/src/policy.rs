//! Scheduling policies: which waiting activity a scheduler serves next.
//!
//! The scheduler owns its queue; a policy only keeps a cursor into it and is
//! told about insertions and removals so the cursor stays valid.

use rcpsp_data::WaitingActivities;

/// Selection strategy for a [`StepScheduler`][crate::StepScheduler].
pub trait SchedulingPolicy: Send {
    fn name(&self) -> &'static str;

    /// An activity was inserted into the queue at `index`.
    fn add(&mut self, _queue: &WaitingActivities, _index: usize) {}

    /// The activity at `index` was removed from the queue.
    fn remove(&mut self, _index: usize) {}

    /// Index of the activity to serve now.
    fn select(&self, queue: &WaitingActivities) -> Option<usize>;

    /// Whether another activity may be tried after the selected one was
    /// refused resources.
    fn another(&self, queue: &WaitingActivities) -> bool;

    /// Move past the selected activity.
    fn next(&mut self, _queue: &WaitingActivities) {}

    /// Start over from the head of the queue.
    fn reset(&mut self) {}

    /// Whether a stall should be reported upstream on `out_demand`.
    fn demand(&self) -> bool;
}

/// Build a fresh policy per scheduler.
pub type PolicyFactory = dyn Fn() -> Box<dyn SchedulingPolicy> + Send + Sync;

// ── FIFO ──────────────────────────────────────────────────────────────────────

/// Strict arrival order.  A blocked head blocks the whole queue until
/// resources come back.
#[derive(Clone, Copy, Debug, Default)]
pub struct FifoPolicy;

impl SchedulingPolicy for FifoPolicy {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn select(&self, queue: &WaitingActivities) -> Option<usize> {
        (!queue.is_empty()).then_some(0)
    }

    fn another(&self, _queue: &WaitingActivities) -> bool {
        false
    }

    fn demand(&self) -> bool {
        true
    }
}

// ── Skip-blocked ──────────────────────────────────────────────────────────────

/// Arrival order, but a refused activity is skipped and the next one tried;
/// the scheduler stalls only once every waiting activity has been refused.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkipBlockedPolicy {
    cursor: usize,
}

impl SchedulingPolicy for SkipBlockedPolicy {
    fn name(&self) -> &'static str {
        "skip-blocked"
    }

    fn add(&mut self, queue: &WaitingActivities, index: usize) {
        let appended = index + 1 == queue.len();
        if !appended && index <= self.cursor {
            self.cursor += 1;
        }
    }

    fn remove(&mut self, index: usize) {
        if index < self.cursor {
            self.cursor -= 1;
        }
    }

    fn select(&self, queue: &WaitingActivities) -> Option<usize> {
        (self.cursor < queue.len()).then_some(self.cursor)
    }

    fn another(&self, queue: &WaitingActivities) -> bool {
        self.cursor + 1 < queue.len()
    }

    fn next(&mut self, queue: &WaitingActivities) {
        if self.cursor < queue.len() {
            self.cursor += 1;
        }
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn demand(&self) -> bool {
        true
    }
}
