//! `rcpsp-core` — foundational types for the rcpsp scheduling framework.
//!
//! This crate is a dependency of every other `rcpsp-*` crate.  It has no
//! `rcpsp-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                      |
//! |------------|-----------------------------------------------|
//! | [`ids`]    | `ComponentId`                                 |
//! | [`time`]   | `Time` (absolute + delta), `SimConfig`        |
//! | [`rng`]    | `SimRng` (seeded instance generation)         |
//! | [`error`]  | `RcpspError`, `RcpspResult`                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{RcpspError, RcpspResult};
pub use ids::ComponentId;
pub use rng::SimRng;
pub use time::{SimConfig, Time};
