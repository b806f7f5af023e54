//! `Activity` — an ordered list of steps forming one unit of work.
//!
//! # Lifecycle
//!
//! ```text
//! PENDING(0) → RUNNING(0) → PENDING(1) → … → DONE
//! ```
//!
//! The step pointer only moves forward (`finish`), one step at a time.  Once
//! it passes the last step the activity is `DONE` and every step-level
//! accessor that needs a current step panics: asking a finished activity for
//! its current step is a programming error.
//!
//! # Resource retention
//!
//! After a step finishes, [`release`][Activity::release] hands back every
//! held token whose type the finished step does *not* flag
//! `retain_across_steps`.  Retained tokens seed the next step's holdings, so
//! its residual demand shrinks accordingly.  At `DONE` everything goes back.

use std::fmt;

use rcpsp_core::Time;

use crate::{ResourceConstraints, Resources, Step, TemporalConstraints};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activity {
    name: String,
    steps: Vec<Step>,
    temporal_constraints: TemporalConstraints,
    /// Index of the current step; `steps.len()` means DONE.
    current: usize,
    allocated: Resources,
}

impl Activity {
    pub fn new(name: impl Into<String>, temporal_constraints: TemporalConstraints) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            temporal_constraints,
            current: 0,
            allocated: Resources::new(),
        }
    }

    /// Build an activity from its steps with no activity-level window.
    pub fn with_steps(name: impl Into<String>, steps: Vec<Step>) -> Self {
        let mut a = Self::new(name, TemporalConstraints::NONE);
        a.steps = steps;
        a
    }

    pub fn add_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn temporal_constraints(&self) -> &TemporalConstraints {
        &self.temporal_constraints
    }

    pub fn allocated_resources(&self) -> &Resources {
        &self.allocated
    }

    /// Current step index, or `None` once DONE.
    pub fn current_index(&self) -> Option<usize> {
        (!self.is_end()).then_some(self.current)
    }

    pub fn is_begin(&self) -> bool {
        self.current == 0
    }

    pub fn is_end(&self) -> bool {
        self.current >= self.steps.len()
    }

    /// # Panics
    /// Panics if the activity is DONE.
    pub fn current_step(&self) -> &Step {
        match self.steps.get(self.current) {
            Some(step) => step,
            None => panic!("activity {:?} has no current step: already DONE", self.name),
        }
    }

    fn current_step_mut(&mut self) -> &mut Step {
        let name = &self.name;
        match self.steps.get_mut(self.current) {
            Some(step) => step,
            None => panic!("activity {name:?} has no current step: already DONE"),
        }
    }

    /// Location of the current step; `None` once DONE.
    pub fn location(&self) -> Option<&str> {
        self.steps.get(self.current).map(|s| s.location.as_str())
    }

    /// The step finished most recently, if any.
    pub fn last_finished_step(&self) -> Option<&Step> {
        self.current.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// Earliest date at which the activity may be released: the later of the
    /// activity-level and current-step early starts.
    pub fn earliest_start(&self) -> Option<Time> {
        let step_es = self.steps.get(self.current).and_then(|s| s.temporal_constraints.early_start);
        match (self.temporal_constraints.early_start, step_es) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    // ── Temporal ──────────────────────────────────────────────────────────

    /// Both the activity window and the current step's window hold at `t`.
    pub fn starting(&self, t: Time) -> bool {
        match self.steps.get(self.current) {
            Some(step) => self.temporal_constraints.starting(t) && step.starting(t),
            None => false,
        }
    }

    /// `true` if no date at or after `t` can satisfy [`starting`][Self::starting].
    pub fn window_closed(&self, t: Time) -> bool {
        match self.steps.get(self.current) {
            Some(step) => {
                self.temporal_constraints.closed(t) || step.temporal_constraints.closed(t)
            }
            None => true,
        }
    }

    /// Record the date the current step started waiting for resources.
    pub fn wait(&mut self, t: Time) {
        self.current_step_mut().wait(t);
    }

    // ── Resources ─────────────────────────────────────────────────────────

    /// Requirement of the current step (empty once DONE).
    pub fn resource_constraints(&self) -> ResourceConstraints {
        self.steps
            .get(self.current)
            .map(|s| s.resource_constraints.clone())
            .unwrap_or_default()
    }

    /// Residual demand of the current step given the tokens already held.
    /// Empty when fully covered, and once DONE.
    pub fn residual_constraints(&self) -> ResourceConstraints {
        match self.steps.get(self.current) {
            Some(step) => step.residual(&self.allocated),
            None => ResourceConstraints::new(),
        }
    }

    /// Merge newly granted tokens into the allocation.
    pub fn assign(&mut self, granted: Resources) {
        self.allocated.append(granted);
    }

    /// Exact satisfaction of the current step by the allocation.  `false`
    /// once DONE.
    pub fn check_resource_constraint(&self) -> bool {
        match self.steps.get(self.current) {
            Some(step) => step.is_satisfied(&self.allocated),
            None => false,
        }
    }

    /// The tokens [`release`][Self::release] would hand back, without
    /// touching the allocation.
    pub fn released_resources(&self) -> Resources {
        if self.is_end() {
            return self.allocated.clone();
        }
        let retaining = self.last_finished_step();
        self.allocated
            .iter()
            .filter(|r| !retaining.is_some_and(|s| s.retains(&r.resource_type)))
            .cloned()
            .collect()
    }

    /// Drop every token the finished step does not retain and return them.
    pub fn release(&mut self) -> Resources {
        if self.is_end() {
            return std::mem::take(&mut self.allocated);
        }
        let Some(finished) = self.current.checked_sub(1).map(|i| &self.steps[i]) else {
            return std::mem::take(&mut self.allocated);
        };
        self.allocated.extract_if(|r| !finished.retains(&r.resource_type))
    }

    // ── Step execution ────────────────────────────────────────────────────

    /// # Panics
    /// Panics if the activity is DONE.
    pub fn start(&mut self, t: Time) {
        self.current_step_mut().start(t);
    }

    /// Exact completion check of the current step.  A DONE activity is
    /// trivially done.
    pub fn done(&self, t: Time) -> bool {
        match self.steps.get(self.current) {
            Some(step) => step.done(t),
            None => true,
        }
    }

    pub fn remaining_time(&self, t: Time) -> Time {
        match self.steps.get(self.current) {
            Some(step) => step.remaining_time(t),
            None => Time::ZERO,
        }
    }

    /// Record the finish date and advance to the next step.
    ///
    /// # Panics
    /// Panics if the activity is DONE.
    pub fn finish(&mut self, t: Time) {
        self.current_step_mut().finish(t);
        self.current += 1;
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.name)?;
        match self.steps.get(self.current) {
            Some(step) => write!(f, " <{}>", step.name)?,
            None => f.write_str(" <DONE>")?,
        }
        f.write_str("]")?;
        if !self.allocated.is_empty() {
            write!(f, " {}", self.allocated)?;
        }
        Ok(())
    }
}
