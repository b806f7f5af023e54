//! Seeded random workshop instances.
//!
//! Three locations in a line (`cutting` → `assembly` → `finishing`), each
//! with a worker pool and one specialised pool.  Every generated demand fits
//! its pool, and a tool is only retained when the next step stays at the
//! same location and needs it again, so every instance runs to completion.

use rcpsp_core::{SimRng, Time};
use rcpsp_data::{
    Activity, ActivityCollection, LocationConfig, Locations, PoolConfig, ResourceConstraint,
    ResourceConstraints, Step, TemporalConstraints,
};

struct Site {
    name:    &'static str,
    special: &'static str,
    tokens:  usize,
}

const SITES: [Site; 3] = [
    Site { name: "cutting",   special: "Saw",   tokens: 2 },
    Site { name: "assembly",  special: "Jig",   tokens: 1 },
    Site { name: "finishing", special: "Booth", tokens: 2 },
];

const WORKERS_PER_SITE: usize = 3;
const TRANSIT: u64 = 2;

fn pool(resource_type: &str, prefix: &str, n: usize) -> PoolConfig {
    PoolConfig {
        resource_type: resource_type.to_string(),
        resources:     (1..=n).map(|i| format!("{prefix}{i}")).collect(),
    }
}

pub fn locations() -> Locations {
    let mut locations = Locations::new();
    for (i, site) in SITES.iter().enumerate() {
        let mut config = LocationConfig::default()
            .with_pool("workers", pool("Worker", &format!("{}-w", site.name), WORKERS_PER_SITE))
            .with_pool(
                site.special.to_lowercase(),
                pool(site.special, &format!("{}-", site.special.to_lowercase()), site.tokens),
            );
        for (j, other) in SITES.iter().enumerate() {
            if i != j {
                config = config.with_transit(other.name, Time(TRANSIT * i.abs_diff(j) as u64));
            }
        }
        locations.insert(site.name, config);
    }
    locations
}

/// `count` activities of one to four steps, released over `[0, horizon)`.
pub fn activities(rng: &mut SimRng, count: usize, horizon: u64) -> ActivityCollection {
    let mut collection = ActivityCollection::new();
    for n in 0..count {
        let mut rng = rng.child(n as u64);
        let release = rng.gen_range(0..horizon.max(1));
        let window = TemporalConstraints::start_window(Some(Time(release)), None);
        let mut activity = Activity::new(format!("job{n:03}"), window);

        let steps = rng.gen_range(1..=4usize);
        let sites: Vec<usize> = (0..steps).map(|_| rng.gen_range(0..SITES.len())).collect();
        // Whether the previous step kept its specialised tool.
        let mut holding = false;
        for (k, &s) in sites.iter().enumerate() {
            let site = &SITES[s];
            let needs_special = holding || rng.gen_bool(0.6);
            let retain = needs_special && sites.get(k + 1) == Some(&s);

            let mut demand = ResourceConstraints::new();
            demand.push(ResourceConstraint::new("Worker", rng.gen_range(1..=2)));
            if needs_special {
                demand.push(if retain {
                    ResourceConstraint::retained(site.special, 1)
                } else {
                    ResourceConstraint::new(site.special, 1)
                });
            }
            holding = retain;

            let duration = Time(rng.gen_range(1..=8));
            activity.add_step(Step::new(format!("op{k}"), duration, site.name, demand));
        }
        collection.push(activity);
    }
    collection
}
