//! Static network configuration: locations, their pools, and transit times.
//!
//! # TOML format
//!
//! ```toml
//! [locations.assembly.pools.fitters]
//! type      = "Fitter"
//! resources = ["fitter-1", "fitter-2"]
//!
//! [locations.assembly.transport]
//! paint = 4        # transit time of an activity arriving from "paint"
//!
//! [locations.paint.pools.booths]
//! type      = "Booth"
//! resources = ["booth-1"]
//! ```
//!
//! Read once at network construction and never mutated afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use rcpsp_core::{RcpspError, Time};

use crate::{DataResult, ResourcePool};

// ── Raw TOML records ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ProblemRecord {
    #[serde(default)]
    locations: BTreeMap<String, LocationRecord>,
}

#[derive(Deserialize)]
struct LocationRecord {
    #[serde(default)]
    pools: BTreeMap<String, PoolRecord>,
    #[serde(default)]
    transport: BTreeMap<String, u64>,
}

#[derive(Deserialize)]
struct PoolRecord {
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(default)]
    resources: Vec<String>,
}

// ── Public config types ───────────────────────────────────────────────────────

/// One pool's definition: its type and the names of its tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    pub resource_type: String,
    pub resources: Vec<String>,
}

impl PoolConfig {
    pub fn build(&self, name: &str) -> ResourcePool {
        ResourcePool::with_tokens(name, self.resource_type.clone(), self.resources.iter().cloned())
    }
}

/// Transit time into a location, keyed by the location the activity comes
/// from.  Unknown origins cost nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Durations(BTreeMap<String, Time>);

impl Durations {
    pub fn insert(&mut self, from: impl Into<String>, duration: Time) {
        self.0.insert(from.into(), duration);
    }

    /// Transit time from `previous`; zero when there is no previous location
    /// or no entry for it.
    pub fn from_location(&self, previous: Option<&str>) -> Time {
        previous
            .and_then(|p| self.0.get(p).copied())
            .unwrap_or(Time::ZERO)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationConfig {
    /// Pool name → definition.
    pub pools: BTreeMap<String, PoolConfig>,
    pub transport: Durations,
}

impl LocationConfig {
    pub fn with_pool(mut self, name: impl Into<String>, pool: PoolConfig) -> Self {
        self.pools.insert(name.into(), pool);
        self
    }

    pub fn with_transit(mut self, from: impl Into<String>, duration: Time) -> Self {
        self.transport.insert(from, duration);
        self
    }

    /// Distinct resource types served by this location's pools.
    pub fn resource_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.pools.values().map(|p| p.resource_type.clone()).collect();
        types.sort();
        types.dedup();
        types
    }
}

/// Location name → configuration, sorted by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Locations(BTreeMap<String, LocationConfig>);

impl Locations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, location: LocationConfig) {
        self.0.insert(name.into(), location);
    }

    pub fn get(&self, name: &str) -> Option<&LocationConfig> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, LocationConfig> {
        self.0.iter()
    }

    /// Parse the TOML format described in the module docs.
    pub fn from_toml_str(s: &str) -> DataResult<Self> {
        let record: ProblemRecord = toml::from_str(s)?;
        let mut locations = Locations::new();

        for (name, loc) in record.locations {
            let mut config = LocationConfig::default();
            for (pool_name, pool) in loc.pools {
                if pool.resource_type.trim().is_empty() {
                    return Err(RcpspError::Config(format!(
                        "pool {pool_name:?} at {name:?} has an empty type"
                    ))
                    .into());
                }
                config.pools.insert(
                    pool_name,
                    PoolConfig { resource_type: pool.resource_type, resources: pool.resources },
                );
            }
            for (from, d) in loc.transport {
                config.transport.insert(from, Time(d));
            }
            locations.insert(name, config);
        }
        Ok(locations)
    }

    pub fn load_toml(path: &Path) -> DataResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
