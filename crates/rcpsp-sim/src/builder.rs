//! Fluent builder that turns a problem definition into a coupled [`Sim`].

use std::collections::BTreeSet;

use rcpsp_core::{ComponentId, SimConfig, Time};
use rcpsp_data::{ActivityCollection, Locations};
use rcpsp_devs::{
    Assignment, FifoPolicy, Observations, PolicyFactory, PoolActor, Port, Processor,
    ProjectScheduler, SchedulingPolicy, StepScheduler, Transport,
};
use tracing::debug;

use crate::{Sim, SimError, SimObserver, SimResult};

/// Name of the root component.
pub const ROOT: &str = "project";

/// Component ids of one location's sub-network.
#[derive(Clone, Debug)]
pub struct LocationIds {
    pub name:       String,
    pub scheduler:  ComponentId,
    pub assignment: ComponentId,
    pub pools:      Vec<ComponentId>,
    pub processor:  ComponentId,
    pub transport:  ComponentId,
}

/// Fluent builder for a [`Network`].
///
/// # Required inputs
///
/// - [`SimConfig`] for the end date
/// - [`Locations`] with at least one location
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                        |
/// |------------------|--------------------------------|
/// | `.activities(c)` | No activities: the run is idle |
/// | `.policy(f)`     | [`FifoPolicy`] everywhere      |
///
/// # Example
///
/// ```rust,ignore
/// let locations = Locations::load_toml(Path::new("problem.toml"))?;
/// let activities = load_activities_csv(Path::new("activities.csv"))?;
/// let mut network = NetworkBuilder::new(SimConfig::default(), locations)
///     .activities(activities)
///     .policy(|| Box::new(SkipBlockedPolicy::default()))
///     .build()?;
/// network.run(&mut NoopObserver)?;
/// ```
pub struct NetworkBuilder {
    config:     SimConfig,
    locations:  Locations,
    activities: ActivityCollection,
    policy:     Box<PolicyFactory>,
}

impl NetworkBuilder {
    pub fn new(config: SimConfig, locations: Locations) -> Self {
        Self {
            config,
            locations,
            activities: ActivityCollection::new(),
            policy: Box::new(|| Box::new(FifoPolicy)),
        }
    }

    /// The activities the root releases into the network.
    pub fn activities(mut self, activities: ActivityCollection) -> Self {
        self.activities = activities;
        self
    }

    /// Build each scheduler's policy with `factory`.
    pub fn policy<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn SchedulingPolicy> + Send + Sync + 'static,
    {
        self.policy = Box::new(factory);
        self
    }

    fn validate(&self) -> SimResult<()> {
        if self.locations.is_empty() {
            return Err(SimError::Config("no locations configured".into()));
        }
        for (name, location) in self.locations.iter() {
            let mut seen = BTreeSet::new();
            for pool in location.pools.values() {
                if !seen.insert(pool.resource_type.as_str()) {
                    return Err(SimError::Config(format!(
                        "location {name:?} has more than one pool of type {:?}",
                        pool.resource_type
                    )));
                }
            }
        }

        let mut names = BTreeSet::new();
        for activity in self.activities.iter() {
            if !names.insert(activity.name()) {
                return Err(SimError::Config(format!("duplicate activity {:?}", activity.name())));
            }
            if activity.steps().is_empty() {
                return Err(SimError::Config(format!("activity {:?} has no steps", activity.name())));
            }
            if let Some(step) = activity.steps().iter().find(|s| !self.locations.contains(&s.location)) {
                return Err(SimError::UnknownLocation {
                    activity: activity.name().to_string(),
                    location: step.location.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validate inputs, create every component and wire them together.
    pub fn build(self) -> SimResult<Network> {
        self.validate()?;

        let mut sim = Sim::new(self.config);
        let root = sim.add(Box::new(ProjectScheduler::new(self.activities)))?;

        // ── Components, per location in name order ────────────────────────
        let mut locations = Vec::with_capacity(self.locations.len());
        for (name, config) in self.locations.iter() {
            let scheduler = sim.add(Box::new(StepScheduler::new(name.as_str(), (self.policy)())))?;
            let assignment = sim.add(Box::new(Assignment::new(
                format!("{name}/assignment"),
                config.resource_types(),
            )))?;
            let mut pools = Vec::with_capacity(config.pools.len());
            for (pool_name, pool) in &config.pools {
                let actor_name = format!("{name}/pool/{pool_name}");
                pools.push(sim.add(Box::new(PoolActor::new(actor_name, pool.build(pool_name))))?);
            }
            let processor = sim.add(Box::new(Processor::new(name)))?;
            let transport = sim.add(Box::new(Transport::new(name.as_str(), config.transport.clone())))?;
            locations.push(LocationIds {
                name: name.clone(),
                scheduler,
                assignment,
                pools,
                processor,
                transport,
            });
        }

        // ── Couplings ─────────────────────────────────────────────────────
        for loc in &locations {
            sim.couple(root, Port::Schedule, loc.transport, Port::Schedule);
            sim.couple(loc.transport, Port::Schedule, loc.scheduler, Port::Schedule);
            for other in &locations {
                sim.couple(loc.scheduler, Port::Schedule, other.transport, Port::Schedule);
            }

            sim.couple(loc.scheduler, Port::Demand, loc.assignment, Port::Demand);
            sim.couple(loc.scheduler, Port::Release, loc.assignment, Port::Release);
            for &pool in &loc.pools {
                sim.couple(loc.assignment, Port::Demand, pool, Port::Demand);
                sim.couple(loc.assignment, Port::Assign, pool, Port::Assign);
                sim.couple(loc.assignment, Port::Release, pool, Port::Release);
                sim.couple(pool, Port::Available, loc.assignment, Port::Available);
                sim.couple(pool, Port::Granted, loc.assignment, Port::Granted);
            }
            sim.couple(loc.assignment, Port::Granted, loc.scheduler, Port::Assign);
            sim.couple(loc.assignment, Port::Unavailable, loc.scheduler, Port::Unavailable);

            sim.couple(loc.scheduler, Port::Process, loc.processor, Port::Process);
            sim.couple(loc.processor, Port::Done, loc.scheduler, Port::Done);
            sim.couple(loc.scheduler, Port::Done, root, Port::Done);

            debug!(location = %loc.name, pools = loc.pools.len(), "location wired");
        }

        Ok(Network { sim, root, locations })
    }
}

/// A ready-to-run scheduling network.
pub struct Network {
    pub sim:   Sim,
    root:      ComponentId,
    locations: Vec<LocationIds>,
}

impl Network {
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Time> {
        self.sim.run(observer)
    }

    pub fn root(&self) -> ComponentId {
        self.root
    }

    pub fn locations(&self) -> &[LocationIds] {
        &self.locations
    }

    pub fn observations(&self, component: &str) -> Option<Observations> {
        self.sim.observations(component)
    }

    /// Names of the activities the root has collected, in completion order.
    pub fn completed(&self) -> Vec<String> {
        self.root_observation("completed")
    }

    /// Names of the activities dropped because their start window closed.
    pub fn missed(&self) -> Vec<String> {
        self.root_observation("missed")
    }

    /// Date of the last completion.
    pub fn makespan(&self) -> Time {
        self.root_observation("makespan")
            .first()
            .and_then(|v| v.parse().ok())
            .map_or(Time::ZERO, Time)
    }

    fn root_observation(&self, key: &str) -> Vec<String> {
        let mut obs = self.sim.component(self.root).observations();
        obs.remove(key).unwrap_or_default()
    }
}
