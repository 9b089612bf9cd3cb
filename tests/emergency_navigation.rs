//! Emergency retargeting and navigation flow tests.
//!
//! Drives the session-control layer against a scripted path oracle to
//! verify end-to-end behavior:
//! - nearest-exit selection and retargeting when distances change
//! - speed-paced re-evaluation intervals
//! - cancellation of the re-evaluation task on deactivation
//! - the bounded no-reachable-exit diagnostic
//! - the ordinary localized-navigate-arrive flow
//!
//! Run with: `cargo test --test emergency_navigation`

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use disha_nav::{
    EmergencyRetargeter, LocalizationMonitor, NavConfig, NavController, NotificationSink,
    PathOracle, PathQueryResult, Poi, PoiId, PoiKind, Point3, Route, Space, VisibilitySink,
    ARRIVED_NOTICE, NO_REACHABLE_EXIT_NOTICE, POSITION_FOUND_NOTICE,
};

// ============================================================================
// Test doubles
// ============================================================================

/// Oracle answering from a scripted route length per destination anchor.
///
/// Anchors without a scripted length get `Invalid`. Counts every query so
/// tests can assert how often the throttles let one through.
struct ScriptedOracle {
    lengths: RefCell<HashMap<(i64, i64, i64), f32>>,
    queries: Cell<u32>,
}

impl ScriptedOracle {
    fn new() -> Self {
        Self {
            lengths: RefCell::new(HashMap::new()),
            queries: Cell::new(0),
        }
    }

    fn key(p: Point3) -> (i64, i64, i64) {
        (
            (p.x * 1000.0).round() as i64,
            (p.y * 1000.0).round() as i64,
            (p.z * 1000.0).round() as i64,
        )
    }

    fn set_length(&self, anchor: Point3, length: f32) {
        self.lengths.borrow_mut().insert(Self::key(anchor), length);
    }

    fn queries(&self) -> u32 {
        self.queries.get()
    }
}

impl PathOracle for ScriptedOracle {
    fn calculate_path(&self, origin: Point3, destination: Point3) -> PathQueryResult {
        self.queries.set(self.queries.get() + 1);
        match self.lengths.borrow().get(&Self::key(destination)) {
            Some(&length) => PathQueryResult::Complete(Route::new(vec![
                origin,
                Point3::new(origin.x + length, origin.y, origin.z),
            ])),
            None => PathQueryResult::Invalid,
        }
    }
}

/// Oracle that routes straight to whatever destination is asked.
struct StraightOracle;

impl PathOracle for StraightOracle {
    fn calculate_path(&self, origin: Point3, destination: Point3) -> PathQueryResult {
        PathQueryResult::Complete(Route::new(vec![origin, destination]))
    }
}

#[derive(Default)]
struct Notices(Vec<String>);

impl NotificationSink for Notices {
    fn notify(&mut self, message: &str) {
        self.0.push(message.to_string());
    }
}

#[derive(Default)]
struct VisibilityLog(Vec<(PoiId, bool)>);

impl VisibilitySink for VisibilityLog {
    fn set_visible(&mut self, poi: PoiId, visible: bool) {
        self.0.push((poi, visible));
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Two exits with anchors far away from the test positions, so straight-line
/// arrival never triggers unless a test walks there on purpose.
fn two_exit_space() -> (Space, PoiId, PoiId) {
    let mut space = Space::new("Main Building");
    let e1 = space.add_poi(
        Poi::new(
            "North Stairwell",
            PoiKind::Staircase,
            Point3::new(100.0, 0.0, 0.0),
        )
        .with_emergency_exit(),
    );
    let e2 = space.add_poi(
        Poi::new(
            "South Stairwell",
            PoiKind::Staircase,
            Point3::new(-100.0, 0.0, 0.0),
        )
        .with_emergency_exit(),
    );
    (space, e1, e2)
}

fn session() -> (NavController, EmergencyRetargeter) {
    let config = NavConfig::default();
    let mut controller = NavController::new(&config);
    controller.set_localized(true);
    (controller, EmergencyRetargeter::new(&config.emergency))
}

// ============================================================================
// Emergency retargeting
// ============================================================================

#[test]
fn test_targets_nearest_exit_and_retargets_on_swap() {
    let (space, e1, e2) = two_exit_space();
    let (mut controller, mut retargeter) = session();
    let oracle = ScriptedOracle::new();
    let mut vis = VisibilityLog::default();
    let mut notices = Notices::default();

    let e1_anchor = space.get(e1).unwrap().anchor;
    let e2_anchor = space.get(e2).unwrap().anchor;
    oracle.set_length(e1_anchor, 10.0);
    oracle.set_length(e2_anchor, 4.0);

    retargeter.activate(0.0, &space, &mut vis);
    // both markers hidden on activation
    assert_eq!(vis.0, vec![(e1, false), (e2, false)]);
    vis.0.clear();

    let pos = Some(Point3::new(0.0, 0.0, 0.0));
    retargeter.update(
        0.0, pos, &space, &oracle, &mut controller, &mut vis, &mut notices,
    );

    assert_eq!(retargeter.targeted_exit(), Some(e2));
    assert_eq!(controller.destination_id(), Some(e2));
    assert_eq!(vis.0, vec![(e2, true)]);
    vis.0.clear();

    // distances swap while the user moves through the building
    oracle.set_length(e1_anchor, 3.0);
    oracle.set_length(e2_anchor, 6.0);

    retargeter.update(
        3.0, pos, &space, &oracle, &mut controller, &mut vis, &mut notices,
    );

    assert_eq!(retargeter.targeted_exit(), Some(e1));
    assert_eq!(controller.destination_id(), Some(e1));
    // exactly one switch: previous hidden, new shown
    assert_eq!(vis.0, vec![(e2, false), (e1, true)]);
    vis.0.clear();

    // nothing changes, no churn on the next cycle
    retargeter.update(
        6.0, pos, &space, &oracle, &mut controller, &mut vis, &mut notices,
    );
    assert_eq!(retargeter.targeted_exit(), Some(e1));
    assert!(vis.0.is_empty());
    assert!(notices.0.is_empty());
}

#[test]
fn test_reevaluation_paced_by_speed() {
    let (space, e1, _) = two_exit_space();
    let (mut controller, mut retargeter) = session();
    let oracle = ScriptedOracle::new();
    let mut vis = VisibilityLog::default();
    let mut notices = Notices::default();

    oracle.set_length(space.get(e1).unwrap().anchor, 5.0);

    retargeter.activate(0.0, &space, &mut vis);
    retargeter.update(
        0.0,
        Some(Point3::new(0.0, 0.0, 0.0)),
        &space,
        &oracle,
        &mut controller,
        &mut vis,
        &mut notices,
    );
    // first cycle: 2 ranking queries (one per exit) + 1 destination prime
    assert_eq!(oracle.queries(), 3);

    // standing still: next evaluation 3 seconds out
    retargeter.update(
        2.9,
        Some(Point3::new(0.0, 0.0, 0.0)),
        &space,
        &oracle,
        &mut controller,
        &mut vis,
        &mut notices,
    );
    assert_eq!(oracle.queries(), 3);

    // 15m in 3s reads as running, so the next wait drops to 0.5s
    retargeter.update(
        3.0,
        Some(Point3::new(15.0, 0.0, 0.0)),
        &space,
        &oracle,
        &mut controller,
        &mut vis,
        &mut notices,
    );
    assert_eq!(oracle.queries(), 5); // ranking only, target unchanged

    retargeter.update(
        3.4,
        Some(Point3::new(17.0, 0.0, 0.0)),
        &space,
        &oracle,
        &mut controller,
        &mut vis,
        &mut notices,
    );
    assert_eq!(oracle.queries(), 5); // 0.4s elapsed, still waiting

    retargeter.update(
        3.5,
        Some(Point3::new(17.5, 0.0, 0.0)),
        &space,
        &oracle,
        &mut controller,
        &mut vis,
        &mut notices,
    );
    assert_eq!(oracle.queries(), 7);
}

#[test]
fn test_activate_twice_keeps_single_task() {
    let (space, e1, _) = two_exit_space();
    let (mut controller, mut retargeter) = session();
    let oracle = ScriptedOracle::new();
    let mut vis = VisibilityLog::default();
    let mut notices = Notices::default();

    oracle.set_length(space.get(e1).unwrap().anchor, 5.0);

    retargeter.activate(0.0, &space, &mut vis);
    retargeter.activate(0.0, &space, &mut vis);

    let pos = Some(Point3::new(0.0, 0.0, 0.0));
    retargeter.update(
        0.0, pos, &space, &oracle, &mut controller, &mut vis, &mut notices,
    );
    let after_first = oracle.queries();

    // a single task is armed: no second evaluation before the deadline
    retargeter.update(
        0.1, pos, &space, &oracle, &mut controller, &mut vis, &mut notices,
    );
    retargeter.update(
        1.0, pos, &space, &oracle, &mut controller, &mut vis, &mut notices,
    );
    assert_eq!(oracle.queries(), after_first);
}

#[test]
fn test_deactivate_cancels_pending_task() {
    let (space, e1, e2) = two_exit_space();
    let (mut controller, mut retargeter) = session();
    let oracle = ScriptedOracle::new();
    let mut vis = VisibilityLog::default();
    let mut notices = Notices::default();

    oracle.set_length(space.get(e1).unwrap().anchor, 5.0);

    retargeter.activate(0.0, &space, &mut vis);
    let pos = Some(Point3::new(0.0, 0.0, 0.0));
    retargeter.update(
        0.0, pos, &space, &oracle, &mut controller, &mut vis, &mut notices,
    );
    assert!(controller.is_navigating());
    vis.0.clear();

    retargeter.deactivate(&mut controller, &space, &mut vis);
    assert!(!retargeter.is_active());
    assert!(!controller.is_navigating());
    // default visibility restored: exits hidden
    assert_eq!(vis.0, vec![(e1, false), (e2, false)]);

    // the pending evaluation never fires, even long past its deadline
    let queries = oracle.queries();
    retargeter.update(
        100.0, pos, &space, &oracle, &mut controller, &mut vis, &mut notices,
    );
    assert_eq!(oracle.queries(), queries);
    assert!(!controller.is_navigating());
}

#[test]
fn test_no_reachable_exit_notice_is_bounded() {
    let (space, _, _) = two_exit_space();
    let (mut controller, mut retargeter) = session();
    // no scripted lengths: every exit query comes back invalid
    let oracle = ScriptedOracle::new();
    let mut vis = VisibilityLog::default();
    let mut notices = Notices::default();

    retargeter.activate(0.0, &space, &mut vis);

    // standing still, one evaluation every 3 seconds
    let pos = Some(Point3::new(0.0, 0.0, 0.0));
    for cycle in 0..7 {
        retargeter.update(
            cycle as f64 * 3.0,
            pos,
            &space,
            &oracle,
            &mut controller,
            &mut vis,
            &mut notices,
        );
    }

    // exactly one diagnostic, raised on the fifth consecutive failure
    assert_eq!(notices.0, vec![NO_REACHABLE_EXIT_NOTICE.to_string()]);
    assert_eq!(retargeter.targeted_exit(), None);
    assert!(!controller.is_navigating());
}

#[test]
fn test_off_mesh_position_retries_without_ranking() {
    let (space, e1, _) = two_exit_space();
    let (mut controller, mut retargeter) = session();
    let oracle = ScriptedOracle::new();
    let mut vis = VisibilityLog::default();
    let mut notices = Notices::default();

    oracle.set_length(space.get(e1).unwrap().anchor, 5.0);

    retargeter.activate(0.0, &space, &mut vis);
    retargeter.update(
        0.0, None, &space, &oracle, &mut controller, &mut vis, &mut notices,
    );
    // off the mesh: no ranking, no destination, retry armed
    assert_eq!(oracle.queries(), 0);
    assert!(!controller.is_navigating());

    retargeter.update(
        3.0,
        Some(Point3::new(0.0, 0.0, 0.0)),
        &space,
        &oracle,
        &mut controller,
        &mut vis,
        &mut notices,
    );
    assert!(controller.is_navigating());
}

// ============================================================================
// Ordinary navigation flow
// ============================================================================

#[test]
fn test_localize_navigate_arrive_flow() {
    let config = NavConfig::default();
    let mut controller = NavController::new(&config);
    let mut monitor = LocalizationMonitor::new(&config.localization);
    let mut notices = Notices::default();
    let oracle = StraightOracle;

    let mut space = Space::new("Main Building");
    let hall = space.add_poi(Poi::new(
        "Lecture Hall A",
        PoiKind::LectureHall,
        Point3::new(9.0, 0.0, 0.0),
    ));

    // nothing works before localization
    assert!(!controller.is_localized());
    monitor.on_position_found(&mut controller, &mut notices);
    assert_eq!(notices.0, vec![POSITION_FOUND_NOTICE.to_string()]);
    notices.0.clear();

    // the user picks the hall from the destination list
    let pick = space.listable()[0];
    assert_eq!(pick.id, hall);
    assert!(controller.set_destination(pick, Some(Point3::default()), &oracle, &mut notices));

    let readout = controller.update(0.05, Some(Point3::default()), &oracle, &mut notices);
    assert!(readout.visible);
    assert_eq!(readout.remaining_distance_m, 9);
    assert_eq!(readout.remaining_duration_s, 20); // 9m at 0.45 m/s
    assert_eq!(readout.distance_label(), "9 meters remaining");
    assert_eq!(readout.duration_label(), "< 1 min");

    // halfway there, progress catches up on the next scheduled recompute
    let readout = controller.update(0.2, Some(Point3::new(4.5, 0.0, 0.0)), &oracle, &mut notices);
    assert!(readout.visible);
    assert_eq!(readout.remaining_distance_m, 4);
    assert!((readout.progress - 0.5).abs() < 1e-6);

    // stepping inside the arrival radius ends the session
    let readout = controller.update(0.05, Some(Point3::new(8.5, 0.0, 0.0)), &oracle, &mut notices);
    assert!(!readout.visible);
    assert!(!controller.is_navigating());
    assert_eq!(notices.0, vec![ARRIVED_NOTICE.to_string()]);
}
