//! CSV activity loader.
//!
//! # CSV format
//!
//! One row per step.  Rows of the same activity keep their file order as step
//! order; activities come out in order of first appearance.
//!
//! ```csv
//! activity,step,duration,location,resources,early_start,late_start
//! frame,cut,5,assembly,Fitter:1;Jig:1:retain,0,
//! frame,weld,3,assembly,Welder:1;Jig:1,,
//! frame,paint,4,paint,Booth:1,,
//! panel,cut,2,assembly,Fitter:2,10,20
//! ```
//!
//! **`resources`** field: items `Type:qty` or `Type:qty:retain` joined by
//! `;`.  An empty field means the step needs nothing.
//!
//! **`early_start` / `late_start`**: the step's start window.  Empty means
//! unbounded on that side.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rcpsp_core::Time;

use crate::{
    Activity, ActivityCollection, DataError, DataResult, ResourceConstraint, ResourceConstraints,
    Step, TemporalConstraints,
};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct StepRecord {
    activity:    String,
    step:        String,
    duration:    u64,
    location:    String,
    #[serde(default)]
    resources:   String,
    early_start: Option<u64>,
    late_start:  Option<u64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the activities of a problem from a CSV file.
pub fn load_activities_csv(path: &Path) -> DataResult<ActivityCollection> {
    let file = std::fs::File::open(path).map_err(DataError::Io)?;
    load_activities_reader(file)
}

/// Like [`load_activities_csv`] but accepts any `Read` source.
pub fn load_activities_reader<R: Read>(reader: R) -> DataResult<ActivityCollection> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut activities: Vec<Activity> = Vec::new();

    for result in csv_reader.deserialize::<StepRecord>() {
        let row = result.map_err(|e| DataError::Parse(e.to_string()))?;

        if row.activity.trim().is_empty() {
            return Err(DataError::Parse(format!("step {:?} has no activity name", row.step)));
        }
        if row.location.trim().is_empty() {
            return Err(DataError::Parse(format!(
                "step {:?} of {:?} has no location",
                row.step, row.activity
            )));
        }

        let window = TemporalConstraints::start_window(
            row.early_start.map(Time),
            row.late_start.map(Time),
        );
        let step = Step::new(
            row.step,
            Time(row.duration),
            row.location,
            parse_resources(&row.resources)?,
        )
        .with_window(window);

        // Rows of one activity are usually adjacent; search from the back.
        match activities.iter_mut().rev().find(|a| a.name() == row.activity) {
            Some(activity) => activity.add_step(step),
            None => activities.push(Activity::with_steps(row.activity, vec![step])),
        }
    }

    Ok(activities.into())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Parse `Type:qty[:retain]` items joined by `;`.
pub fn parse_resources(s: &str) -> DataResult<ResourceConstraints> {
    let mut constraints = ResourceConstraints::new();
    for item in s.split(';').map(str::trim).filter(|i| !i.is_empty()) {
        constraints.push(parse_constraint(item)?);
    }
    Ok(constraints)
}

fn parse_constraint(item: &str) -> DataResult<ResourceConstraint> {
    let mut parts = item.split(':').map(str::trim);
    let resource_type = match parts.next() {
        Some(t) if !t.is_empty() => t,
        _ => return Err(DataError::Parse(format!("resource item {item:?} has no type"))),
    };
    let quantity = parts
        .next()
        .ok_or_else(|| DataError::Parse(format!("resource item {item:?} has no quantity")))?
        .parse::<u32>()
        .map_err(|_| {
            DataError::Parse(format!("invalid quantity in {item:?}: expected an unsigned integer"))
        })?;
    let constraint = match parts.next() {
        None => ResourceConstraint::new(resource_type, quantity),
        Some("retain") => ResourceConstraint::retained(resource_type, quantity),
        Some(flag) => {
            return Err(DataError::Parse(format!(
                "invalid flag {flag:?} in {item:?}: expected \"retain\""
            )));
        }
    };
    if parts.next().is_some() {
        return Err(DataError::Parse(format!("too many fields in resource item {item:?}")));
    }
    Ok(constraint)
}
