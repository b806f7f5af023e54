//! `rcpsp-output` — schedule output for the rcpsp framework.
//!
//! | Backend | Files created                  |
//! |---------|--------------------------------|
//! | CSV     | `steps.csv`, `activities.csv`  |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`ScheduleObserver`], which implements `rcpsp_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rcpsp_output::{CsvWriter, ScheduleObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = ScheduleObserver::new(writer);
//! network.run(&mut obs).unwrap();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::ScheduleObserver;
pub use row::{ActivityRow, StepRow};
pub use writer::OutputWriter;
