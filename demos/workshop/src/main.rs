//! workshop — a small job shop run through the rcpsp scheduling network.
//!
//! Two runs:
//!
//! 1. an embedded two-location problem (TOML locations + CSV activities)
//!    under the default FIFO policy;
//! 2. a seeded random instance over three locations under the
//!    skip-blocked policy.
//!
//! Each run writes `steps.csv` and `activities.csv` under `output/workshop/`.
//! Set `RUST_LOG=debug` to follow the protocol message by message.

mod generate;

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rcpsp_core::{SimConfig, SimRng};
use rcpsp_data::{load_activities_reader, ActivityCollection, Locations};
use rcpsp_devs::SkipBlockedPolicy;
use rcpsp_output::{CsvWriter, ScheduleObserver};
use rcpsp_sim::NetworkBuilder;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:           u64   = 42;
const GENERATED_JOBS: usize = 40;
const RELEASE_WINDOW: u64   = 30;

// ── Embedded problem ──────────────────────────────────────────────────────────

// Two benches and a paint shop.  Moving between them takes 3 time units.
const LOCATIONS_TOML: &str = r#"
[locations.bench.pools.fitters]
type = "Fitter"
resources = ["ann", "bo", "cy"]

[locations.bench.pools.clamps]
type = "Clamp"
resources = ["clamp-1"]

[locations.bench.transport]
paint = 3

[locations.paint.pools.painters]
type = "Painter"
resources = ["dee", "eli"]

[locations.paint.transport]
bench = 3
"#;

// `glue` keeps the clamp for `press`, so `shelf` waits for the pair.
const ACTIVITIES_CSV: &str = "\
activity,step,duration,location,resources,early_start,late_start\n\
cabinet,glue,4,bench,Fitter:1;Clamp:1:retain,,\n\
cabinet,press,2,bench,Fitter:1;Clamp:1,,\n\
cabinet,spray,5,paint,Painter:2,,\n\
shelf,fit,3,bench,Fitter:2;Clamp:1,,\n\
shelf,spray,2,paint,Painter:1,,\n\
stool,fit,2,bench,Fitter:2,1,\n\
stool,spray,1,paint,Painter:1,,\n\
sign,spray,3,paint,Painter:1,6,10\n\
";

// ── Runs ──────────────────────────────────────────────────────────────────────

fn run(
    label:      &str,
    config:     SimConfig,
    locations:  Locations,
    activities: ActivityCollection,
    skip:       bool,
) -> Result<()> {
    let count = activities.len();
    let mut builder = NetworkBuilder::new(config, locations)
        .activities(activities);
    if skip {
        builder = builder.policy(|| Box::new(SkipBlockedPolicy::default()));
    }
    let mut network = builder.build()?;

    let dir = Path::new("output/workshop").join(label);
    std::fs::create_dir_all(&dir)?;
    let mut obs = ScheduleObserver::new(CsvWriter::new(&dir)?);

    let t0 = Instant::now();
    let end = network.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    info!(run = label, end = %end, "run finished");
    println!("── {label} ──");
    println!("  activities         : {count}");
    println!("  completed          : {}", network.completed().len());
    println!("  missed windows     : {}", network.missed().len());
    println!("  makespan           : {}", network.makespan().0);
    println!("  steps.csv          : {} rows", obs.steps_written());
    println!("  activities.csv     : {} rows", obs.activities_written());
    println!("  wall clock         : {:.3} ms", elapsed.as_secs_f64() * 1e3);

    for loc in network.locations() {
        let name = format!("{}/scheduler", loc.name);
        if let Some(waiting) = network.observations(&name).and_then(|mut o| o.remove("waiting")) {
            if !waiting.is_empty() {
                println!("  still waiting at {:<10}: {}", loc.name, waiting.join(", "));
            }
        }
    }
    println!();
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== workshop — rcpsp scheduling network ===");
    println!();

    let locations = Locations::from_toml_str(LOCATIONS_TOML)?;
    let activities = load_activities_reader(Cursor::new(ACTIVITIES_CSV))?;
    run("embedded", SimConfig::default(), locations, activities, false)?;

    let config = SimConfig { end_time: None, seed: SEED };
    let mut rng = SimRng::new(config.seed);
    let activities = generate::activities(&mut rng, GENERATED_JOBS, RELEASE_WINDOW);
    run("generated", config, generate::locations(), activities, true)?;

    Ok(())
}
