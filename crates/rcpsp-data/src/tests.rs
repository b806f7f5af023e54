//! Unit tests for rcpsp-data.

use rcpsp_core::Time;

use crate::{
    Activity, ResourceConstraint, ResourceConstraints, Resource, Resources, Step,
    TemporalConstraints,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn tokens(resource_type: &str, n: usize) -> Resources {
    (0..n).map(|i| Resource::new(format!("{resource_type}-{i}"), resource_type)).collect()
}

fn rc(items: &[(&str, u32)]) -> ResourceConstraints {
    items.iter().map(|&(t, q)| ResourceConstraint::new(t, q)).collect()
}

fn step(name: &str, duration: u64, constraints: ResourceConstraints) -> Step {
    Step::new(name, Time(duration), "shop", constraints)
}

// ── ResourceConstraints ───────────────────────────────────────────────────────

#[cfg(test)]
mod constraints {
    use super::*;

    #[test]
    fn residual_keeps_only_positive_remainders() {
        let c = rc(&[("A", 3), ("B", 2)]);
        let residual = c.residual(&tokens("A", 3));
        assert_eq!(residual, rc(&[("B", 2)]));
        assert_eq!(residual.quantity_of("A"), 0);
    }

    #[test]
    fn residual_of_nothing_held_is_whole_requirement_sorted() {
        let c = rc(&[("B", 2), ("A", 1)]);
        assert_eq!(c.residual(&Resources::new()), rc(&[("A", 1), ("B", 2)]));
    }

    #[test]
    fn residual_drops_retain_flag() {
        let c: ResourceConstraints = vec![ResourceConstraint::retained("Tool", 1)].into();
        let residual = c.residual(&Resources::new());
        assert!(!residual.iter().next().unwrap().retain_across_steps);
    }

    #[test]
    fn is_satisfied_is_exact() {
        let c = rc(&[("Worker", 2)]);
        assert!(!c.is_satisfied(&tokens("Worker", 1)), "too few");
        assert!(c.is_satisfied(&tokens("Worker", 2)), "exact");
        assert!(!c.is_satisfied(&tokens("Worker", 3)), "too many");
    }

    #[test]
    fn unreferenced_type_fails_satisfaction() {
        let c = rc(&[("Worker", 1)]);
        let mut held = tokens("Worker", 1);
        held.append(tokens("Drill", 1));
        assert!(!c.is_satisfied(&held));
    }

    #[test]
    fn empty_constraint_satisfied_by_empty_holding() {
        assert!(ResourceConstraints::new().is_satisfied(&Resources::new()));
    }

    #[test]
    fn totals_and_types() {
        let c = rc(&[("A", 3), ("B", 2), ("A", 1)]);
        assert_eq!(c.total_quantity(), 6);
        assert_eq!(c.quantity_of("A"), 4);
        assert_eq!(c.types(), vec!["A", "B"]);
    }

    #[test]
    fn display() {
        let c: ResourceConstraints =
            vec![ResourceConstraint::new("A", 2), ResourceConstraint::retained("T", 1)].into();
        assert_eq!(c.to_string(), "[A:2, T:1:retain]");
    }
}

// ── ResourcePool ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod pool {
    use rcpsp_core::SimRng;

    use super::*;
    use crate::ResourcePool;

    fn workers(n: usize) -> ResourcePool {
        ResourcePool::with_tokens("crew", "Worker", (0..n).map(|i| format!("w{i}")))
    }

    #[test]
    fn assign_withdraws_exactly_n() {
        let mut pool = workers(3);
        let granted = pool.assign(2);
        assert_eq!(granted.len(), 2);
        assert_eq!(pool.quantity(), 1);
        assert!(granted.iter().all(|r| r.resource_type == "Worker"));
    }

    #[test]
    #[should_panic(expected = "asked for 4")]
    fn over_assign_panics() {
        let mut pool = workers(3);
        let _ = pool.assign(4);
    }

    #[test]
    fn release_filters_foreign_types() {
        let mut pool = workers(1);
        let mut back = Resources::new();
        back.push(Resource::new("w9", "Worker"));
        back.push(Resource::new("d1", "Drill"));
        assert_eq!(pool.release(back), 1);
        assert_eq!(pool.quantity(), 2);
        assert_eq!(pool.available().count_of("Drill"), 0);
    }

    #[test]
    fn add_drops_foreign_type() {
        let mut pool = workers(0);
        pool.add(Resource::new("d1", "Drill"));
        pool.add(Resource::new("w1", "Worker"));
        assert_eq!(pool.quantity(), 1);
    }

    /// Random interleavings of assign/release restore the pool exactly once
    /// every withdrawn token has come back.
    #[test]
    fn conservation_under_random_sequences() {
        let mut rng = SimRng::new(0xC0FFEE);
        for _ in 0..20 {
            let size = rng.gen_range(1..=12usize);
            let mut pool = workers(size);
            let mut before = pool.available().names();
            before.sort();

            let mut outstanding: Vec<Resources> = Vec::new();
            for _ in 0..50 {
                if rng.gen_bool(0.5) || outstanding.is_empty() {
                    let n = rng.gen_range(0..=pool.quantity());
                    outstanding.push(pool.assign(n));
                } else {
                    let i = rng.gen_range(0..outstanding.len());
                    pool.release(outstanding.swap_remove(i));
                }
                let held: usize = outstanding.iter().map(Resources::len).sum();
                assert_eq!(pool.quantity() + held, size);
            }

            for r in outstanding.drain(..) {
                pool.release(r);
            }
            let mut after = pool.available().names();
            after.sort();
            assert_eq!(pool.quantity(), size);
            assert_eq!(after, before, "every token returned exactly once");
        }
    }
}

// ── TemporalConstraints ───────────────────────────────────────────────────────

#[cfg(test)]
mod temporal {
    use super::*;

    #[test]
    fn closed_window() {
        let w = TemporalConstraints::start_window(Some(Time(5)), Some(Time(10)));
        assert!(!w.starting(Time(4)));
        assert!(w.starting(Time(5)));
        assert!(w.starting(Time(10)));
        assert!(!w.starting(Time(11)));
        assert!(!w.closed(Time(10)));
        assert!(w.closed(Time(11)));
    }

    #[test]
    fn open_bounds() {
        assert!(TemporalConstraints::NONE.starting(Time(0)));
        assert!(TemporalConstraints::NONE.starting(Time(1_000_000)));
        assert!(!TemporalConstraints::NONE.closed(Time(1_000_000)));

        let early_only = TemporalConstraints::start_window(Some(Time(3)), None);
        assert!(!early_only.starting(Time(2)));
        assert!(early_only.starting(Time(300)));

        let late_only = TemporalConstraints::start_window(None, Some(Time(3)));
        assert!(late_only.starting(Time(0)));
        assert!(!late_only.starting(Time(4)));
    }
}

// ── Activity lifecycle ────────────────────────────────────────────────────────

#[cfg(test)]
mod activity {
    use super::*;

    fn two_steps() -> Activity {
        Activity::with_steps("job", vec![step("S1", 5, rc(&[])), step("S2", 3, rc(&[]))])
    }

    #[test]
    fn step_progression() {
        let mut a = two_steps();
        assert!(a.is_begin());
        a.start(Time(0));
        assert!(!a.done(Time(4)));
        assert!(a.done(Time(5)));
        a.finish(Time(5));
        assert_eq!(a.current_index(), Some(1));
        assert_eq!(a.current_step().name, "S2");

        a.start(Time(5));
        assert!(!a.done(Time(7)));
        assert!(a.done(Time(8)));
        a.finish(Time(8));
        assert!(a.is_end());
        assert_eq!(a.current_index(), None);
        assert_eq!(a.steps()[1].finish_time, Some(Time(8)));
    }

    #[test]
    fn done_is_exact() {
        let mut a = two_steps();
        a.start(Time(2));
        assert!(a.done(Time(7)));
        assert!(!a.done(Time(8)), "completion past the exact instant is not done");
        assert_eq!(a.remaining_time(Time(4)), Time(3));
    }

    #[test]
    fn unstarted_step_is_not_done() {
        let a = two_steps();
        assert!(!a.done(Time(5)));
        assert_eq!(a.remaining_time(Time(0)), Time(5));
    }

    #[test]
    #[should_panic(expected = "already DONE")]
    fn start_past_end_panics() {
        let mut a = Activity::with_steps("job", vec![step("S1", 1, rc(&[]))]);
        a.start(Time(0));
        a.finish(Time(1));
        a.start(Time(1));
    }

    #[test]
    #[should_panic(expected = "already DONE")]
    fn current_step_of_finished_activity_panics() {
        let a = Activity::with_steps("empty", Vec::new());
        let _ = a.current_step();
    }

    #[test]
    fn assign_merges_without_overwriting() {
        let mut a = Activity::with_steps("job", vec![step("S1", 1, rc(&[("A", 1), ("B", 1)]))]);
        a.assign(tokens("A", 1));
        assert!(!a.check_resource_constraint());
        assert_eq!(a.residual_constraints(), rc(&[("B", 1)]));
        a.assign(tokens("B", 1));
        assert!(a.check_resource_constraint());
        assert_eq!(a.allocated_resources().len(), 2);
        assert!(a.residual_constraints().is_empty());
    }

    #[test]
    fn retained_tool_stays_for_next_step() {
        let s1: ResourceConstraints = vec![ResourceConstraint::retained("Tool", 1)].into();
        let mut a = Activity::with_steps(
            "job",
            vec![step("S1", 2, s1), step("S2", 2, rc(&[("Tool", 1)]))],
        );
        a.assign(tokens("Tool", 1));
        a.start(Time(0));
        a.finish(Time(2));

        assert!(a.released_resources().is_empty());
        assert!(a.release().is_empty());
        assert_eq!(a.allocated_resources().count_of("Tool"), 1);
        assert!(a.residual_constraints().is_empty());
        assert!(a.check_resource_constraint());

        a.start(Time(2));
        a.finish(Time(4));
        let back = a.release();
        assert_eq!(back.count_of("Tool"), 1, "everything returns at DONE");
        assert!(a.allocated_resources().is_empty());
    }

    #[test]
    fn consumables_return_while_tools_stay() {
        let s1: ResourceConstraints =
            vec![ResourceConstraint::retained("Tool", 1), ResourceConstraint::new("Part", 2)]
                .into();
        let mut a = Activity::with_steps(
            "job",
            vec![step("S1", 1, s1), step("S2", 1, rc(&[("Tool", 1), ("Part", 1)]))],
        );
        let mut held = tokens("Tool", 1);
        held.append(tokens("Part", 2));
        a.assign(held);
        a.start(Time(0));
        a.finish(Time(1));

        assert_eq!(a.released_resources().count_of("Part"), 2);
        let back = a.release();
        assert_eq!(back.len(), 2);
        assert_eq!(back.count_of("Part"), 2);
        assert_eq!(a.residual_constraints(), rc(&[("Part", 1)]));
    }

    #[test]
    fn starting_combines_activity_and_step_windows() {
        let s = step("S1", 1, rc(&[]))
            .with_window(TemporalConstraints::start_window(Some(Time(4)), None));
        let mut a = Activity::new("job", TemporalConstraints::start_window(Some(Time(2)), Some(Time(6))));
        a.add_step(s);
        assert!(!a.starting(Time(3)));
        assert!(a.starting(Time(4)));
        assert!(!a.starting(Time(7)));
        assert_eq!(a.earliest_start(), Some(Time(4)));
        assert!(a.window_closed(Time(7)));
    }

    #[test]
    fn location_follows_current_step() {
        let mut a = Activity::with_steps(
            "job",
            vec![
                Step::new("cut", Time(1), "assembly", rc(&[])),
                Step::new("paint", Time(1), "paint", rc(&[])),
            ],
        );
        assert_eq!(a.location(), Some("assembly"));
        a.start(Time(0));
        a.finish(Time(1));
        assert_eq!(a.location(), Some("paint"));
        assert_eq!(a.last_finished_step().map(|s| s.name.as_str()), Some("cut"));
        a.start(Time(1));
        a.finish(Time(2));
        assert_eq!(a.location(), None);
    }

    #[test]
    fn display() {
        let mut a = two_steps();
        assert_eq!(a.to_string(), "[job <S1>]");
        a.assign(tokens("A", 1));
        assert_eq!(a.to_string(), "[job <S1>] {A:A-0}");
    }
}

// ── Collections ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod collection {
    use super::*;
    use crate::{ActivityCollection, WaitingActivities};

    fn windowed(name: &str, es: Option<u64>, ls: Option<u64>) -> Activity {
        let s = step("S1", 1, rc(&[]))
            .with_window(TemporalConstraints::start_window(es.map(Time), ls.map(Time)));
        Activity::with_steps(name, vec![s])
    }

    #[test]
    fn take_starting_and_next_start() {
        let mut c: ActivityCollection = vec![
            windowed("a", Some(0), None),
            windowed("b", Some(5), None),
            windowed("c", None, None),
        ]
        .into();

        let now = c.take_starting(Time(0));
        let names: Vec<&str> = now.iter().map(Activity::name).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(now[0].steps()[0].wait_time, Some(Time(0)));
        assert_eq!(c.next_start(Time(0)), Time(5));
        assert_eq!(c.next_start(Time(2)), Time(3));

        let later = c.take_starting(Time(5));
        assert_eq!(later.len(), 1);
        assert!(c.is_empty());
        assert_eq!(c.next_start(Time(5)), Time::INFINITY);
    }

    #[test]
    fn take_missed_drops_closed_windows() {
        let mut c: ActivityCollection =
            vec![windowed("late", Some(0), Some(3)), windowed("open", Some(10), None)].into();
        let missed = c.take_missed(Time(4));
        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].name(), "late");
        assert_eq!(c.names(), vec!["open".to_string()]);
    }

    #[test]
    fn observations() {
        let mut a = windowed("a", None, None);
        a.assign(tokens("Worker", 2));
        let mut done = windowed("d", None, None);
        done.start(Time(0));
        done.finish(Time(1));
        let c: ActivityCollection = vec![a, done].into();
        assert_eq!(c.step_names(), vec!["S1".to_string(), "DONE".to_string()]);
        assert_eq!(c.used_resources().len(), 2);
        assert_eq!(c.used_resource_types().get("Worker"), Some(&2));
        assert_eq!(c.position("d"), Some(1));
    }

    #[test]
    fn waiting_queue_index_removal() {
        let mut q = WaitingActivities::new();
        for n in ["A", "B", "C"] {
            q.push_back(windowed(n, None, None));
        }
        let b = q.remove(1).unwrap();
        assert_eq!(b.name(), "B");
        assert_eq!(q.names(), vec!["A".to_string(), "C".to_string()]);
        assert!(q.remove(5).is_none());
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;
    use crate::{load_activities_reader, parse_resources, DataError, Locations};

    const ACTIVITIES: &str = "\
activity,step,duration,location,resources,early_start,late_start
frame,cut,5,assembly,Fitter:1;Jig:1:retain,0,
frame,weld,3,assembly,Welder:1;Jig:1,,
frame,paint,4,paint,Booth:1,,
panel,cut,2,assembly,Fitter:2,10,20
";

    const LOCATIONS: &str = r#"
[locations.assembly.pools.fitters]
type      = "Fitter"
resources = ["fitter-1", "fitter-2"]

[locations.assembly.pools.jigs]
type      = "Jig"
resources = ["jig-1"]

[locations.assembly.transport]
paint = 4

[locations.paint.pools.booths]
type      = "Booth"
resources = ["booth-1"]
"#;

    #[test]
    fn activities_grouped_in_file_order() {
        let c = load_activities_reader(Cursor::new(ACTIVITIES)).unwrap();
        assert_eq!(c.names(), vec!["frame".to_string(), "panel".to_string()]);

        let frame = c.iter().next().unwrap();
        let names: Vec<&str> = frame.steps().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["cut", "weld", "paint"]);
        assert_eq!(frame.steps()[2].location, "paint");
        assert_eq!(frame.steps()[0].duration, Time(5));
        assert!(frame.steps()[0].resource_constraints.retains("Jig"));
        assert!(!frame.steps()[1].resource_constraints.retains("Jig"));
        assert_eq!(frame.steps()[0].temporal_constraints.early_start, Some(Time(0)));
        assert_eq!(frame.steps()[0].temporal_constraints.late_start, None);
        assert!(!frame.steps()[1].temporal_constraints.has_start_window());
    }

    #[test]
    fn step_window_columns() {
        let c = load_activities_reader(Cursor::new(ACTIVITIES)).unwrap();
        let panel = c.iter().nth(1).unwrap();
        let w = panel.steps()[0].temporal_constraints;
        assert_eq!((w.early_start, w.late_start), (Some(Time(10)), Some(Time(20))));
        assert_eq!(panel.earliest_start(), Some(Time(10)));
    }

    #[test]
    fn resource_items() {
        let c = parse_resources("A:2; B:1:retain").unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.quantity_of("A"), 2);
        assert!(c.retains("B"));
        assert!(parse_resources("").unwrap().is_empty());
    }

    #[test]
    fn bad_resource_items_rejected() {
        assert!(matches!(parse_resources("A:x"), Err(DataError::Parse(_))));
        assert!(matches!(parse_resources("A"), Err(DataError::Parse(_))));
        assert!(matches!(parse_resources("A:1:keep"), Err(DataError::Parse(_))));
        assert!(matches!(parse_resources(":1"), Err(DataError::Parse(_))));
    }

    #[test]
    fn bad_duration_is_parse_error() {
        let csv = "activity,step,duration,location,resources,early_start,late_start\n\
                   a,s,soon,shop,,,\n";
        assert!(matches!(load_activities_reader(Cursor::new(csv)), Err(DataError::Parse(_))));
    }

    #[test]
    fn locations_from_toml() {
        let locs = Locations::from_toml_str(LOCATIONS).unwrap();
        assert_eq!(locs.len(), 2);
        assert!(locs.contains("paint"));

        let assembly = locs.get("assembly").unwrap();
        assert_eq!(assembly.resource_types(), vec!["Fitter".to_string(), "Jig".to_string()]);
        assert_eq!(assembly.transport.from_location(Some("paint")), Time(4));
        assert_eq!(assembly.transport.from_location(Some("elsewhere")), Time::ZERO);
        assert_eq!(assembly.transport.from_location(None), Time::ZERO);

        let pool = assembly.pools["fitters"].build("fitters");
        assert_eq!(pool.quantity(), 2);
        assert_eq!(pool.resource_type(), "Fitter");
    }

    #[test]
    fn empty_pool_type_rejected() {
        let toml = "[locations.a.pools.p]\ntype = \"\"\nresources = []\n";
        assert!(matches!(Locations::from_toml_str(toml), Err(DataError::Core(_))));
    }

    #[test]
    fn malformed_toml_rejected() {
        let toml = "[locations.a.pools.p]\nresources = [\"x\"]\n";
        assert!(matches!(Locations::from_toml_str(toml), Err(DataError::Toml(_))));
    }
}
