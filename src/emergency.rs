//! Emergency-mode exit retargeting.
//!
//! While emergency mode is active the system autonomously keeps navigation
//! pointed at the nearest reachable exit: every POI marker is hidden except
//! the targeted exit, and a repeating re-evaluation task re-ranks the exit
//! candidates as the user moves. The task paces itself to the user's
//! walking speed - someone running gets re-evaluated every half second,
//! someone standing still every three - and terminates once the user is
//! within the arrival radius of the targeted exit.
//!
//! The "loop" is a deadline checked against the host-supplied clock, i.e. a
//! cancellable timed task under the host's cooperative tick. Deactivation
//! cancels the deadline before any other mutation, so a stale resumption
//! can never retarget after the mode was switched off.

use crate::config::EmergencyConfig;
use crate::controller::{NavController, ARRIVED_NOTICE};
use crate::core::math::lerp;
use crate::core::Point3;
use crate::estimation::PoiDistance;
use crate::oracle::PathOracle;
use crate::poi::{Poi, PoiId, Space};
use crate::sinks::{NotificationSink, VisibilitySink};

/// Raised after repeated ranking cycles found no reachable exit.
pub const NO_REACHABLE_EXIT_NOTICE: &str =
    "No reachable emergency exit found. Please follow the posted escape route signs.";

/// Nearest-exit retargeting state machine.
///
/// Two states, inactive and active; both transitions are idempotent.
/// Driven by [`EmergencyRetargeter::update`] with the host clock (seconds)
/// and the user's current position.
pub struct EmergencyRetargeter {
    /// Re-evaluation interval at standstill (seconds).
    eval_interval_slow_s: f32,

    /// Re-evaluation interval at or above the reference speed (seconds).
    eval_interval_fast_s: f32,

    /// Speed that maps to the fast interval (m/s).
    reference_speed_mps: f32,

    /// Distance to the targeted exit that counts as arrival (meters).
    arrival_radius_m: f32,

    /// Consecutive failed ranking cycles before the diagnostic notice.
    unreachable_notice_after: u32,

    /// True while emergency mode is active.
    active: bool,

    /// Deadline of the pending re-evaluation task, if one is armed.
    next_eval_at: Option<f64>,

    /// Last (time, position) sample used for speed measurement.
    last_sample: Option<(f64, Point3)>,

    /// Exit currently targeted, once the first ranking succeeded.
    targeted_exit: Option<PoiId>,

    /// Ranking cycles in a row that found no reachable exit.
    consecutive_failures: u32,
}

impl EmergencyRetargeter {
    /// Create a retargeter in the inactive state.
    pub fn new(config: &EmergencyConfig) -> Self {
        Self {
            eval_interval_slow_s: config.eval_interval_slow_s,
            eval_interval_fast_s: config.eval_interval_fast_s,
            reference_speed_mps: config.reference_speed_mps,
            arrival_radius_m: config.arrival_radius_m,
            unreachable_notice_after: config.unreachable_notice_after,
            active: false,
            next_eval_at: None,
            last_sample: None,
            targeted_exit: None,
            consecutive_failures: 0,
        }
    }

    /// Check if emergency mode is active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The exit currently targeted, if any.
    pub fn targeted_exit(&self) -> Option<PoiId> {
        self.targeted_exit
    }

    /// Wait interval for the measured user speed.
    ///
    /// Linear interpolation from the slow ceiling to the fast floor over
    /// speed normalized by the reference speed, clamped to [0, 1].
    pub fn eval_interval(&self, speed_mps: f32) -> f32 {
        let t = (speed_mps / self.reference_speed_mps).clamp(0.0, 1.0);
        lerp(self.eval_interval_slow_s, self.eval_interval_fast_s, t)
    }

    /// Enter emergency mode.
    ///
    /// Hides every POI marker (ordinary and exit) and arms the
    /// re-evaluation task if one is not already armed. A no-op while
    /// already active with a running task.
    pub fn activate(&mut self, now: f64, space: &Space, visibility: &mut impl VisibilitySink) {
        if self.active {
            if self.next_eval_at.is_none() {
                // loop terminated on arrival; restart it
                self.last_sample = None;
                self.next_eval_at = Some(now);
                log::info!("Emergency re-evaluation restarted");
            }
            return;
        }

        self.active = true;
        self.targeted_exit = None;
        self.last_sample = None;
        self.consecutive_failures = 0;

        for poi in space.pois() {
            visibility.set_visible(poi.id, false);
        }

        self.next_eval_at = Some(now);
        log::info!("Emergency mode activated");
    }

    /// Leave emergency mode.
    ///
    /// Cancels the pending re-evaluation task before any other mutation,
    /// stops navigation and restores the default POI visibility (exits
    /// hidden, everything else shown). A no-op while inactive.
    pub fn deactivate(
        &mut self,
        controller: &mut NavController,
        space: &Space,
        visibility: &mut impl VisibilitySink,
    ) {
        if !self.active {
            return;
        }

        // cancel first: a stale resumption must not fire mid-teardown
        self.next_eval_at = None;
        self.active = false;
        self.last_sample = None;
        self.targeted_exit = None;
        self.consecutive_failures = 0;

        controller.stop_navigation();

        for poi in space.pois() {
            visibility.set_visible(poi.id, !poi.is_emergency_exit);
        }

        log::info!("Emergency mode deactivated");
    }

    /// Run one re-evaluation cycle if the armed deadline has passed.
    ///
    /// Call once per host tick with the current clock reading (seconds)
    /// and user position (`None` while off the navigable surface). Does
    /// nothing while inactive, while no task is armed, or before the
    /// deadline.
    pub fn update<O: PathOracle>(
        &mut self,
        now: f64,
        position: Option<Point3>,
        space: &Space,
        oracle: &O,
        controller: &mut NavController,
        visibility: &mut impl VisibilitySink,
        notifications: &mut impl NotificationSink,
    ) {
        if !self.active {
            return;
        }
        let Some(deadline) = self.next_eval_at else {
            return;
        };
        if now < deadline {
            return;
        }

        let Some(position) = position else {
            // off the mesh; retry at the slow pace
            self.next_eval_at = Some(now + f64::from(self.eval_interval_slow_s));
            return;
        };

        let speed = match self.last_sample {
            Some((t, p)) if now > t => position.distance(&p) / (now - t) as f32,
            _ => 0.0,
        };
        self.last_sample = Some((now, position));
        let interval = self.eval_interval(speed);

        self.rank_and_retarget(position, space, oracle, controller, visibility, notifications);

        // arrival at the targeted exit ends navigation and the loop
        if let Some(exit) = self.targeted_exit.and_then(|id| space.get(id)) {
            if position.distance(&exit.anchor) <= self.arrival_radius_m {
                self.next_eval_at = None;
                // drop the target so a restarted loop retargets cleanly
                self.targeted_exit = None;
                if controller.stop_navigation() {
                    notifications.notify(ARRIVED_NOTICE);
                }
                log::info!("Arrived at emergency exit {}", exit.name);
                return;
            }
        }

        self.next_eval_at = Some(now + f64::from(interval));
    }

    /// Rank every exit candidate and switch the target when the nearest
    /// one changed identity. Ties go to the first minimum in candidate
    /// order; the switch is made once per cycle, never mid-ranking.
    fn rank_and_retarget<O: PathOracle>(
        &mut self,
        position: Point3,
        space: &Space,
        oracle: &O,
        controller: &mut NavController,
        visibility: &mut impl VisibilitySink,
        notifications: &mut impl NotificationSink,
    ) {
        let mut nearest: Option<(&Poi, f32)> = None;
        for exit in space.exits() {
            if let PoiDistance::Reachable(distance) =
                controller
                    .estimator()
                    .estimate_distance_to_poi(oracle, Some(position), exit)
            {
                if nearest.map_or(true, |(_, best)| distance < best) {
                    nearest = Some((exit, distance));
                }
            }
        }

        let Some((exit, distance)) = nearest else {
            self.consecutive_failures += 1;
            log::warn!(
                "No reachable emergency exit ({} consecutive failures)",
                self.consecutive_failures
            );
            if self.consecutive_failures == self.unreachable_notice_after {
                notifications.notify(NO_REACHABLE_EXIT_NOTICE);
            }
            return;
        };
        self.consecutive_failures = 0;

        if self.targeted_exit == Some(exit.id) {
            return;
        }

        log::info!("Nearest exit is now {} ({:.1}m)", exit.name, distance);

        if let Some(previous) = self.targeted_exit.take() {
            visibility.set_visible(previous, false);
        }

        if controller.set_destination(exit, Some(position), oracle, notifications) {
            visibility.set_visible(exit.id, true);
            self.targeted_exit = Some(exit.id);
        }
    }
}
