//! Integration tests for rcpsp-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{ActivityRow, StepRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn step_row(activity: &str, start: u64) -> StepRow {
        StepRow {
            activity: activity.to_string(),
            step:     "s1".to_string(),
            location: "shop".to_string(),
            wait:     Some(0),
            start,
            finish:   start + 2,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("steps.csv").exists());
        assert!(dir.path().join("activities.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("steps.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["activity", "step", "location", "wait", "start", "finish", "waited"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("activities.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["activity", "start", "finish", "steps"]);
    }

    #[test]
    fn csv_step_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_step(&step_row("A", 0)).unwrap();
        w.write_step(&step_row("B", 3)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("steps.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "B");
        assert_eq!(&rows[1][4], "3"); // start
        assert_eq!(&rows[1][5], "5"); // finish
        assert_eq!(&rows[1][6], "3"); // waited since 0
    }

    #[test]
    fn csv_missing_wait_left_blank() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_step(&StepRow { wait: None, ..step_row("A", 4) }).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("steps.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][3], "");
        assert_eq!(&rows[0][6], "0");
    }

    #[test]
    fn csv_activity_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_activity(&ActivityRow {
            activity: "A".to_string(),
            start:    1,
            finish:   9,
            steps:    3,
        })
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("activities.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][2], "9");
        assert_eq!(&rows[0][3], "3");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap(); // second call should not panic
    }
}

#[cfg(test)]
mod observer_tests {
    use rcpsp_core::{SimConfig, Time};
    use rcpsp_data::{
        parse_resources, Activity, ActivityCollection, LocationConfig, Locations, PoolConfig, Step,
    };
    use rcpsp_sim::NetworkBuilder;
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::observer::ScheduleObserver;
    use crate::row::{ActivityRow, StepRow};
    use crate::writer::OutputWriter;
    use crate::OutputResult;

    /// Keeps rows in memory.
    #[derive(Default)]
    struct MemoryWriter {
        steps:      Vec<StepRow>,
        activities: Vec<ActivityRow>,
        finished:   usize,
    }

    impl OutputWriter for MemoryWriter {
        fn write_step(&mut self, row: &StepRow) -> OutputResult<()> {
            self.steps.push(row.clone());
            Ok(())
        }
        fn write_activity(&mut self, row: &ActivityRow) -> OutputResult<()> {
            self.activities.push(row.clone());
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    fn step(name: &str, duration: u64, location: &str, resources: &str) -> Step {
        Step::new(name, Time(duration), location, parse_resources(resources).unwrap())
    }

    /// Two locations, one activity crossing them, one staying local.
    fn network_inputs() -> (Locations, ActivityCollection) {
        let mut locations = Locations::new();
        locations.insert(
            "cut",
            LocationConfig::default().with_pool(
                "saws",
                PoolConfig { resource_type: "Saw".into(), resources: vec!["s1".into()] },
            ),
        );
        locations.insert(
            "paint",
            LocationConfig::default()
                .with_pool(
                    "booths",
                    PoolConfig { resource_type: "Booth".into(), resources: vec!["b1".into()] },
                )
                .with_transit("cut", Time(1)),
        );
        let mut activities = ActivityCollection::new();
        activities.push(Activity::with_steps(
            "chair",
            vec![step("saw", 2, "cut", "Saw:1"), step("coat", 3, "paint", "Booth:1")],
        ));
        activities.push(Activity::with_steps("plank", vec![step("saw", 1, "cut", "Saw:1")]));
        (locations, activities)
    }

    #[test]
    fn records_steps_and_activities() {
        let (locations, activities) = network_inputs();
        let mut network = NetworkBuilder::new(SimConfig::default(), locations)
            .activities(activities)
            .build()
            .unwrap();
        let mut obs = ScheduleObserver::new(MemoryWriter::default());
        network.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());
        assert_eq!(obs.steps_written(), 3);
        assert_eq!(obs.activities_written(), 2);
        assert_eq!(obs.makespan(), Time(6));

        let writer = obs.into_writer();
        assert_eq!(writer.finished, 1);

        let plank = writer.steps.iter().find(|r| r.activity == "plank").unwrap();
        assert_eq!((plank.start, plank.finish), (2, 3));
        assert_eq!(plank.waited(), 2);

        let coat = writer.steps.iter().find(|r| r.step == "coat").unwrap();
        assert_eq!(coat.location, "paint");
        assert_eq!((coat.start, coat.finish), (3, 6));

        let chair = writer.activities.iter().find(|r| r.activity == "chair").unwrap();
        assert_eq!(*chair, ActivityRow { activity: "chair".into(), start: 0, finish: 6, steps: 2 });
    }

    #[test]
    fn integration_csv() {
        let (locations, activities) = network_inputs();
        let mut network = NetworkBuilder::new(SimConfig::default(), locations)
            .activities(activities)
            .build()
            .unwrap();

        let dir: TempDir = tempfile::tempdir().expect("create temp dir");
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = ScheduleObserver::new(writer);
        network.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("steps.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3, "expected 3 step rows, got {}", rows.len());

        let mut rdr = csv::Reader::from_path(dir.path().join("activities.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "plank");
        assert_eq!(&rows[1][0], "chair");
    }
}
