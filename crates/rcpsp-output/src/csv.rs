//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `steps.csv`
//! - `activities.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{ActivityRow, OutputResult, StepRow};

/// Writes the realized schedule to two CSV files.
pub struct CsvWriter {
    steps:      Writer<File>,
    activities: Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut steps = Writer::from_path(dir.join("steps.csv"))?;
        steps.write_record(["activity", "step", "location", "wait", "start", "finish", "waited"])?;

        let mut activities = Writer::from_path(dir.join("activities.csv"))?;
        activities.write_record(["activity", "start", "finish", "steps"])?;

        Ok(Self { steps, activities, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_step(&mut self, row: &StepRow) -> OutputResult<()> {
        self.steps.write_record(&[
            row.activity.clone(),
            row.step.clone(),
            row.location.clone(),
            row.wait.map(|w| w.to_string()).unwrap_or_default(),
            row.start.to_string(),
            row.finish.to_string(),
            row.waited().to_string(),
        ])?;
        Ok(())
    }

    fn write_activity(&mut self, row: &ActivityRow) -> OutputResult<()> {
        self.activities.write_record(&[
            row.activity.clone(),
            row.start.to_string(),
            row.finish.to_string(),
            row.steps.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.steps.flush()?;
        self.activities.flush()?;
        Ok(())
    }
}
