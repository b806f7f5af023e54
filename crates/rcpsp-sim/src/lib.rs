//! `rcpsp-sim` — discrete-event coordinator and network construction.
//!
//! # Event loop
//!
//! ```text
//! loop:
//!   t = min(next) over all components          (stop if inf or ≥ end_time)
//!   ① Output     — imminent components emit, in insertion order
//!   ② Route      — each message is cloned to every coupled (target, port);
//!                  uncoupled messages only reach the observer
//!   ③ Transition — confluent / internal / external per component
//!   ④ Schedule   — next = t + time_advance()
//! ```
//!
//! Zero-time cascades (every protocol send phase) run as successive cycles
//! at the same date.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                         |
//! |-----------|------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for coupling lookups |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rcpsp_core::SimConfig;
//! use rcpsp_data::{load_activities_csv, Locations};
//! use rcpsp_sim::{NetworkBuilder, NoopObserver};
//!
//! let locations = Locations::load_toml(Path::new("problem.toml"))?;
//! let activities = load_activities_csv(Path::new("activities.csv"))?;
//! let mut network = NetworkBuilder::new(SimConfig::default(), locations)
//!     .activities(activities)
//!     .build()?;
//! network.run(&mut NoopObserver)?;
//! println!("makespan {}", network.makespan());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::{LocationIds, Network, NetworkBuilder, ROOT};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, MAX_CYCLES_PER_INSTANT};
