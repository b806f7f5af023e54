//! Declarative resource requirements.
//!
//! # Satisfaction is exact
//!
//! [`ResourceConstraints::is_satisfied`] requires the held count of every
//! referenced type to *equal* the requirement.  Holding a surplus fails, and
//! so does holding a type the constraint does not mention.  The scheduler
//! relies on this closed-world check before dispatching a step.

use std::collections::BTreeMap;
use std::fmt;

use crate::Resources;

// ── ResourceConstraint ────────────────────────────────────────────────────────

/// `quantity` tokens of `resource_type`; with `retain_across_steps` the
/// tokens stay with the activity after the step finishes instead of going
/// back to their pool.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceConstraint {
    pub resource_type: String,
    pub quantity: u32,
    pub retain_across_steps: bool,
}

impl ResourceConstraint {
    pub fn new(resource_type: impl Into<String>, quantity: u32) -> Self {
        Self { resource_type: resource_type.into(), quantity, retain_across_steps: false }
    }

    /// Same requirement, but the tokens are kept for the following steps.
    pub fn retained(resource_type: impl Into<String>, quantity: u32) -> Self {
        Self { resource_type: resource_type.into(), quantity, retain_across_steps: true }
    }
}

impl fmt::Display for ResourceConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.quantity)?;
        if self.retain_across_steps {
            f.write_str(":retain")?;
        }
        Ok(())
    }
}

// ── ResourceConstraints ───────────────────────────────────────────────────────

/// Ordered list of requirements for one step (or one residual demand).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceConstraints(Vec<ResourceConstraint>);

impl ResourceConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, constraint: ResourceConstraint) {
        self.0.push(constraint);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceConstraint> {
        self.0.iter()
    }

    /// Sum of all required quantities.
    pub fn total_quantity(&self) -> u32 {
        self.0.iter().map(|c| c.quantity).sum()
    }

    /// Required quantity of `resource_type` (0 if not referenced).
    pub fn quantity_of(&self, resource_type: &str) -> u32 {
        self.0
            .iter()
            .filter(|c| c.resource_type == resource_type)
            .map(|c| c.quantity)
            .sum()
    }

    /// Distinct resource types, in first-appearance order.
    pub fn types(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.0.len());
        for c in &self.0 {
            if !out.contains(&c.resource_type.as_str()) {
                out.push(&c.resource_type);
            }
        }
        out
    }

    /// `true` if some requirement on `resource_type` keeps its tokens after
    /// the step finishes.
    pub fn retains(&self, resource_type: &str) -> bool {
        self.0
            .iter()
            .any(|c| c.resource_type == resource_type && c.retain_across_steps)
    }

    /// Demand still outstanding once `held` is taken into account.
    ///
    /// Per type: required minus held, keeping only strictly positive
    /// remainders.  Entries come out sorted by type and never carry the
    /// retain flag (a demand is not a holding rule).
    pub fn residual(&self, held: &Resources) -> ResourceConstraints {
        self.balance(held)
            .into_iter()
            .filter(|&(_, n)| n > 0)
            .map(|(t, n)| ResourceConstraint::new(t, n as u32))
            .collect()
    }

    /// Exact per-type match between requirement and `held`.  Holding more
    /// than required fails too; callers that carry retained tokens into a
    /// step that does not ask for them will never be satisfied.
    pub fn is_satisfied(&self, held: &Resources) -> bool {
        self.balance(held).values().all(|&n| n == 0)
    }

    /// required - held, per type, over the union of both type sets.
    fn balance(&self, held: &Resources) -> BTreeMap<String, i64> {
        let mut balance: BTreeMap<String, i64> = BTreeMap::new();
        for c in &self.0 {
            *balance.entry(c.resource_type.clone()).or_insert(0) += c.quantity as i64;
        }
        for r in held {
            *balance.entry(r.resource_type.clone()).or_insert(0) -= 1;
        }
        balance
    }
}

impl From<Vec<ResourceConstraint>> for ResourceConstraints {
    fn from(v: Vec<ResourceConstraint>) -> Self {
        ResourceConstraints(v)
    }
}

impl FromIterator<ResourceConstraint> for ResourceConstraints {
    fn from_iter<I: IntoIterator<Item = ResourceConstraint>>(iter: I) -> Self {
        ResourceConstraints(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ResourceConstraints {
    type Item = &'a ResourceConstraint;
    type IntoIter = std::slice::Iter<'a, ResourceConstraint>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ResourceConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("]")
    }
}
