//! Typed resource tokens and owned token sets.
//!
//! A [`Resource`] is held by exactly one owner at a time: a pool's available
//! set or an activity's allocation.  Transfer is by move between [`Resources`]
//! sets; a token is never shared.

use std::collections::BTreeMap;
use std::fmt;

/// One named token of a given resource type (e.g. `"drill-2"` of `"Drill"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resource {
    pub name: String,
    pub resource_type: String,
}

impl Resource {
    pub fn new(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self { name: name.into(), resource_type: resource_type.into() }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.name)
    }
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// An owned, unordered collection of tokens (possibly of mixed types).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resources(Vec<Resource>);

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, resource: Resource) {
        self.0.push(resource);
    }

    pub fn pop(&mut self) -> Option<Resource> {
        self.0.pop()
    }

    /// Move every token of `other` into `self`.
    pub fn append(&mut self, other: Resources) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.0.iter()
    }

    /// Number of held tokens of `resource_type`.
    pub fn count_of(&self, resource_type: &str) -> usize {
        self.0.iter().filter(|r| r.resource_type == resource_type).count()
    }

    /// Per-type token counts, sorted by type name.
    pub fn type_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.0 {
            *counts.entry(r.resource_type.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|r| r.name.clone()).collect()
    }

    /// Split off the tokens matching `pred`, keeping the rest in `self`.
    pub fn extract_if<F>(&mut self, mut pred: F) -> Resources
    where
        F: FnMut(&Resource) -> bool,
    {
        let (taken, kept): (Vec<_>, Vec<_>) = self.0.drain(..).partition(|r| pred(r));
        self.0 = kept;
        Resources(taken)
    }

    pub fn into_vec(self) -> Vec<Resource> {
        self.0
    }
}

impl From<Vec<Resource>> for Resources {
    fn from(v: Vec<Resource>) -> Self {
        Resources(v)
    }
}

impl FromIterator<Resource> for Resources {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        Resources(iter.into_iter().collect())
    }
}

impl IntoIterator for Resources {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Resources {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, r) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{r}")?;
        }
        f.write_str("}")
    }
}
