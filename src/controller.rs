//! Navigation controller.
//!
//! Owns the current destination and wires the per-tick flow together:
//! recompute scheduling, oracle queries, distance estimation and the
//! user-facing readout. The host drives it with `update(delta, position)`
//! once per frame and forwards destination picks from the POI list through
//! [`NavController::set_destination`].

use crate::config::NavConfig;
use crate::core::Point3;
use crate::estimation::DistanceEstimator;
use crate::oracle::{PathOracle, PathQueryResult};
use crate::poi::{Poi, PoiId};
use crate::scheduler::RecomputeScheduler;
use crate::sinks::NotificationSink;
use serde::{Deserialize, Serialize};

/// Shown when the oracle reports a partial route to the destination.
pub const ROUTE_UNREACHABLE_NOTICE: &str =
    "Problem calculating route. Please contact the publisher (see imprint).";

/// Shown on arrival at the destination.
pub const ARRIVED_NOTICE: &str = "You arrived at the destination!";

/// Per-tick readout for the navigation UI.
///
/// When `visible` is false the remaining distance/time texts should be
/// hidden entirely (no route known, not localized, or not navigating);
/// the numeric fields are zero in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavReadout {
    /// Whether the readout should be displayed at all.
    pub visible: bool,

    /// Remaining distance in whole meters.
    pub remaining_distance_m: u32,

    /// Remaining duration in whole seconds.
    pub remaining_duration_s: u32,

    /// Progress since navigation start, in [0, 1].
    pub progress: f32,
}

impl NavReadout {
    /// A hidden readout (suppressed display).
    pub fn hidden() -> Self {
        Self {
            visible: false,
            remaining_distance_m: 0,
            remaining_duration_s: 0,
            progress: 0.0,
        }
    }

    /// Display label for the remaining distance.
    pub fn distance_label(&self) -> String {
        if self.remaining_distance_m <= 1 {
            format!("{} meter remaining", self.remaining_distance_m)
        } else {
            format!("{} meters remaining", self.remaining_distance_m)
        }
    }

    /// Display label for the remaining duration, in whole minutes.
    pub fn duration_label(&self) -> String {
        let minutes = self.remaining_duration_s / 60;
        if minutes == 0 {
            "< 1 min".to_string()
        } else {
            format!("{} min", minutes)
        }
    }
}

/// The POI currently navigated to.
#[derive(Debug, Clone)]
struct Destination {
    id: PoiId,
    name: String,
    anchor: Point3,
}

/// Session navigation controller.
///
/// Call [`NavController::update`] at the display rate with the frame delta
/// and the user's current position (`None` when off the navigable surface).
pub struct NavController {
    /// Distance to the destination anchor that counts as arrival (meters).
    arrival_radius_m: f32,

    /// Current destination, if navigating.
    destination: Option<Destination>,

    /// True while the device pose is tracked well enough for navigation.
    localized: bool,

    /// True while the last oracle answer was a usable route.
    route_available: bool,

    scheduler: RecomputeScheduler,
    estimator: DistanceEstimator,
}

impl NavController {
    /// Create a controller with the given configuration.
    pub fn new(config: &NavConfig) -> Self {
        Self {
            arrival_radius_m: config.controller.arrival_radius_m,
            destination: None,
            localized: false,
            route_available: false,
            scheduler: RecomputeScheduler::new(&config.scheduler),
            estimator: DistanceEstimator::new(&config.estimation),
        }
    }

    /// The session's distance estimator (shared with the retargeter for
    /// one-shot POI distance queries).
    pub fn estimator(&self) -> &DistanceEstimator {
        &self.estimator
    }

    /// Update the localization state (driven by the host's tracking events).
    pub fn set_localized(&mut self, localized: bool) {
        self.localized = localized;
    }

    /// Check if the device is currently localized.
    pub fn is_localized(&self) -> bool {
        self.localized
    }

    /// Check if a destination is currently set.
    pub fn is_navigating(&self) -> bool {
        self.destination.is_some()
    }

    /// ID of the current destination, if any.
    pub fn destination_id(&self) -> Option<PoiId> {
        self.destination.as_ref().map(|d| d.id)
    }

    /// Name of the current destination, if any.
    pub fn destination_name(&self) -> Option<&str> {
        self.destination.as_ref().map(|d| d.name.as_str())
    }

    /// Set a POI as the navigation destination.
    ///
    /// Resets the estimation session, then issues one immediate path query
    /// so the readout is primed before the first scheduled recompute. A
    /// partial route cancels the destination on the spot with a single
    /// user notification.
    ///
    /// Returns `true` if the destination was accepted.
    pub fn set_destination<O: PathOracle>(
        &mut self,
        poi: &Poi,
        origin: Option<Point3>,
        oracle: &O,
        notifications: &mut impl NotificationSink,
    ) -> bool {
        self.estimator.reset_estimation();
        self.scheduler.reset();
        self.route_available = false;
        self.destination = Some(Destination {
            id: poi.id,
            name: poi.name.clone(),
            anchor: poi.anchor,
        });

        if self.localized {
            if let Some(origin) = origin {
                match oracle.calculate_path(origin, poi.anchor) {
                    PathQueryResult::Complete(route) => {
                        self.route_available = route.has_distance_info();
                        self.estimator.update_estimation(&route);
                    }
                    PathQueryResult::Partial(_) => {
                        log::warn!("Partial route to {}, cancelling navigation", poi.name);
                        notifications.notify(ROUTE_UNREACHABLE_NOTICE);
                        self.destination = None;
                        return false;
                    }
                    PathQueryResult::Invalid => {
                        // keep the destination, retry on the scheduled ticks
                        log::debug!("No route to {} yet", poi.name);
                    }
                }
            }
        }

        log::info!("Navigating to {}", poi.name);
        true
    }

    /// Stop navigation and clear the estimation session.
    ///
    /// Returns `true` if navigation was in progress.
    pub fn stop_navigation(&mut self) -> bool {
        match self.destination.take() {
            Some(dest) => {
                self.estimator.reset_estimation();
                self.scheduler.reset();
                self.route_available = false;
                log::info!("Navigation to {} stopped", dest.name);
                true
            }
            None => false,
        }
    }

    /// Per-frame update.
    ///
    /// Checks arrival, issues at most one throttled oracle query and
    /// returns the readout for this frame. `position` is `None` when the
    /// user is not on the navigable surface; the query is skipped and the
    /// readout suppressed in that case, as it is while not localized.
    pub fn update<O: PathOracle>(
        &mut self,
        delta_s: f32,
        position: Option<Point3>,
        oracle: &O,
        notifications: &mut impl NotificationSink,
    ) -> NavReadout {
        let Some(dest) = self.destination.clone() else {
            return NavReadout::hidden();
        };

        if !self.localized {
            return NavReadout::hidden();
        }

        let Some(position) = position else {
            return NavReadout::hidden();
        };

        if position.distance(&dest.anchor) <= self.arrival_radius_m {
            log::info!("Arrived at {}", dest.name);
            self.stop_navigation();
            notifications.notify(ARRIVED_NOTICE);
            return NavReadout::hidden();
        }

        if self.scheduler.tick(delta_s) {
            match oracle.calculate_path(position, dest.anchor) {
                PathQueryResult::Complete(route) => {
                    self.route_available = route.has_distance_info();
                    self.estimator.update_estimation(&route);
                }
                PathQueryResult::Partial(_) => {
                    log::warn!("Route to {} became partial, cancelling", dest.name);
                    self.stop_navigation();
                    notifications.notify(ROUTE_UNREACHABLE_NOTICE);
                    return NavReadout::hidden();
                }
                PathQueryResult::Invalid => {
                    self.route_available = false;
                }
            }
        }

        if !self.route_available || !self.estimator.started() {
            return NavReadout::hidden();
        }

        NavReadout {
            visible: true,
            remaining_distance_m: self.estimator.remaining_distance_meters(),
            remaining_duration_s: self.estimator.remaining_duration_seconds(),
            progress: self.estimator.progress_fraction(),
        }
    }
}
