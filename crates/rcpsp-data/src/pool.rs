//! `ResourcePool` — interchangeable tokens of a single type.

use crate::{Resource, Resources};

/// A named pool of same-type tokens.
///
/// Invariant: every token in `available` has `resource_type == self.resource_type`.
/// Tokens are interchangeable; `assign` makes no promise about which ones
/// are handed out.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    name: String,
    resource_type: String,
    available: Resources,
}

impl ResourcePool {
    pub fn new(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
            available: Resources::new(),
        }
    }

    /// Build a pool holding one token per name in `token_names`.
    pub fn with_tokens<I, S>(name: impl Into<String>, resource_type: impl Into<String>, token_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pool = Self::new(name, resource_type);
        for token in token_names {
            pool.available.push(Resource::new(token, pool.resource_type.clone()));
        }
        pool
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Number of tokens currently available.
    pub fn quantity(&self) -> usize {
        self.available.len()
    }

    pub fn available(&self) -> &Resources {
        &self.available
    }

    /// Add one token.  Tokens of another type are dropped.
    pub fn add(&mut self, resource: Resource) {
        if resource.resource_type == self.resource_type {
            self.available.push(resource);
        }
    }

    /// Withdraw exactly `n` tokens.
    ///
    /// # Panics
    ///
    /// Panics if `n > self.quantity()`.  Callers must check availability
    /// first; over-assignment is a logic error, not a recoverable condition.
    pub fn assign(&mut self, n: usize) -> Resources {
        assert!(
            n <= self.quantity(),
            "pool {:?} asked for {n} {} token(s) but holds {}",
            self.name,
            self.resource_type,
            self.quantity()
        );
        let mut out = Resources::new();
        for _ in 0..n {
            if let Some(r) = self.available.pop() {
                out.push(r);
            }
        }
        out
    }

    /// Return tokens to the pool.  Only tokens of this pool's type are kept;
    /// mismatched ones are dropped.  Returns how many were accepted.
    pub fn release(&mut self, resources: Resources) -> usize {
        let mut accepted = 0;
        for r in resources {
            if r.resource_type == self.resource_type {
                self.available.push(r);
                accepted += 1;
            }
        }
        accepted
    }
}
