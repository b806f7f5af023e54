//! Activity collections: the project's pending set and a scheduler's queue.
//!
//! Both own their activities by value.  Removal is index-based or by
//! draining into a secondary `Vec`, never by holding an iterator across a
//! mutation.

use std::collections::{BTreeMap, VecDeque};

use rcpsp_core::Time;

use crate::Activity;

// ── ActivityCollection ────────────────────────────────────────────────────────

/// Ordered set of activities with derived views used by the project root:
/// which activities may start now, and how long until the next one may.
#[derive(Clone, Debug, Default)]
pub struct ActivityCollection {
    activities: Vec<Activity>,
}

impl ActivityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, activity: Activity) {
        self.activities.push(activity);
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Activity> {
        self.activities.iter()
    }

    /// Remove and return, in order, every activity whose window holds at `t`.
    /// Each one is stamped with `t` as its wait date.
    pub fn take_starting(&mut self, t: Time) -> Vec<Activity> {
        let (mut starting, rest): (Vec<_>, Vec<_>) =
            self.activities.drain(..).partition(|a| a.starting(t));
        self.activities = rest;
        for a in &mut starting {
            a.wait(t);
        }
        starting
    }

    /// Remove and return every activity that can no longer start at or
    /// after `t` (window closed, or no step at all).
    pub fn take_missed(&mut self, t: Time) -> Vec<Activity> {
        let (missed, rest): (Vec<_>, Vec<_>) =
            self.activities.drain(..).partition(|a| a.window_closed(t));
        self.activities = rest;
        missed
    }

    /// Delay from `t` until the earliest future early start among the
    /// remaining activities; `Time::INFINITY` when none lies ahead.
    pub fn next_start(&self, t: Time) -> Time {
        self.activities
            .iter()
            .filter_map(Activity::earliest_start)
            .filter(|&es| es > t)
            .min()
            .map_or(Time::INFINITY, |es| es.since(t))
    }

    // ── Observations ──────────────────────────────────────────────────────

    pub fn names(&self) -> Vec<String> {
        self.activities.iter().map(|a| a.name().to_string()).collect()
    }

    /// Names of the current steps (`"DONE"` for finished activities).
    pub fn step_names(&self) -> Vec<String> {
        self.activities
            .iter()
            .map(|a| match a.current_index() {
                Some(_) => a.current_step().name.clone(),
                None => "DONE".to_string(),
            })
            .collect()
    }

    /// Names of every token held by the activities.
    pub fn used_resources(&self) -> Vec<String> {
        self.activities
            .iter()
            .flat_map(|a| a.allocated_resources().names())
            .collect()
    }

    /// Held token counts per resource type.
    pub fn used_resource_types(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for a in &self.activities {
            for (t, n) in a.allocated_resources().type_counts() {
                *counts.entry(t).or_insert(0) += n;
            }
        }
        counts
    }

    /// Position of the activity called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.activities.iter().position(|a| a.name() == name)
    }

    pub fn remove(&mut self, index: usize) -> Activity {
        self.activities.remove(index)
    }

    /// Take every activity out, leaving the collection empty.
    pub fn drain(&mut self) -> Vec<Activity> {
        std::mem::take(&mut self.activities)
    }
}

impl From<Vec<Activity>> for ActivityCollection {
    fn from(activities: Vec<Activity>) -> Self {
        Self { activities }
    }
}

impl FromIterator<Activity> for ActivityCollection {
    fn from_iter<I: IntoIterator<Item = Activity>>(iter: I) -> Self {
        Self { activities: iter.into_iter().collect() }
    }
}

// ── WaitingActivities ─────────────────────────────────────────────────────────

/// A scheduler's queue of activities waiting for resources, in arrival order.
///
/// Selection order is decided by the scheduling policy, which addresses
/// entries by index.
#[derive(Clone, Debug, Default)]
pub struct WaitingActivities(VecDeque<Activity>);

impl WaitingActivities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push_back(&mut self, activity: Activity) {
        self.0.push_back(activity);
    }

    pub fn push_front(&mut self, activity: Activity) {
        self.0.push_front(activity);
    }

    /// Position of the activity called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|a| a.name() == name)
    }

    pub fn get(&self, index: usize) -> Option<&Activity> {
        self.0.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Activity> {
        self.0.get_mut(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<Activity> {
        self.0.remove(index)
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Activity> {
        self.0.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|a| a.name().to_string()).collect()
    }
}
