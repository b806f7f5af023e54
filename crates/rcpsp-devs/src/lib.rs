//! `rcpsp-devs` — the discrete-event components of a scheduling network.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`dynamics`]   | `Dynamics` trait, `Observations`                           |
//! | [`event`]      | `Port`, `Payload`, `ExternalEvent`                         |
//! | [`pool`]       | `PoolActor` — one resource pool                            |
//! | [`assignment`] | `Assignment` — all-or-nothing arbitration over pools       |
//! | [`policy`]     | `SchedulingPolicy`, `FifoPolicy`, `SkipBlockedPolicy`      |
//! | [`scheduler`]  | `StepScheduler` — per-location protocol                    |
//! | [`processor`]  | `Processor` — step timers                                  |
//! | [`transport`]  | `Transport` — transit delays between locations             |
//! | [`project`]    | `ProjectScheduler` — releases activities, collects results |
//! | [`error`]      | `DevsError`, `DevsResult<T>`                               |
//!
//! # One location
//!
//! ```text
//!            schedule                     demand / release
//! Transport ─────────▶ StepScheduler ─────────────────────▶ Assignment ──▶ PoolActor × K
//!                       │   ▲    ▲                          │    ▲              │
//!               process │   │    └── granted / unavailable ─┘    └─ available ──┘
//!                       ▼   │ done                                  / granted
//!                      Processor
//! ```
//!
//! Components never share state.  Everything they exchange is an owned
//! [`ExternalEvent`] value.

pub mod assignment;
pub mod dynamics;
pub mod error;
pub mod event;
pub mod policy;
pub mod pool;
pub mod processor;
pub mod project;
pub mod scheduler;
pub mod transport;


pub use assignment::Assignment;
pub use dynamics::{Dynamics, Observations};
pub use error::{DevsError, DevsResult};
pub use event::{ExternalEvent, Payload, Port};
pub use policy::{FifoPolicy, PolicyFactory, SchedulingPolicy, SkipBlockedPolicy};
pub use pool::PoolActor;
pub use processor::Processor;
pub use project::ProjectScheduler;
pub use scheduler::{SchedulerPhase, StepScheduler};
pub use transport::Transport;
