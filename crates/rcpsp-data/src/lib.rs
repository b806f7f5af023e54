//! `rcpsp-data` — the domain data of a resource-constrained project.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`resource`]   | `Resource`, `Resources` (owned token sets)                  |
//! | [`pool`]       | `ResourcePool`                                              |
//! | [`constraint`] | `ResourceConstraint`, `ResourceConstraints`                 |
//! | [`temporal`]   | `TemporalConstraints`                                       |
//! | [`step`]       | `Step`                                                      |
//! | [`activity`]   | `Activity` (step pointer, allocation, retention)            |
//! | [`collection`] | `ActivityCollection`, `WaitingActivities`                   |
//! | [`problem`]    | `Locations`, `LocationConfig`, `PoolConfig`, `Durations`    |
//! | [`loader`]     | `load_activities_csv`, `load_activities_reader`             |
//! | [`error`]      | `DataError`, `DataResult<T>`                                |
//!
//! # Ownership
//!
//! Every `Resource` lives in exactly one `Resources` set at a time: a pool's
//! available tokens or an activity's allocation.  Every `Activity` lives in
//! exactly one container.  Both move by value; nothing here is shared.

pub mod activity;
pub mod collection;
pub mod constraint;
pub mod error;
pub mod loader;
pub mod pool;
pub mod problem;
pub mod resource;
pub mod step;
pub mod temporal;

#[cfg(test)]
mod tests;

pub use activity::Activity;
pub use collection::{ActivityCollection, WaitingActivities};
pub use constraint::{ResourceConstraint, ResourceConstraints};
pub use error::{DataError, DataResult};
pub use loader::{load_activities_csv, load_activities_reader, parse_resources};
pub use pool::ResourcePool;
pub use problem::{Durations, LocationConfig, Locations, PoolConfig};
pub use resource::{Resource, Resources};
pub use step::Step;
pub use temporal::TemporalConstraints;
