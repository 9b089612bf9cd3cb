//! Remaining distance and arrival time estimation.
//!
//! The [`DistanceEstimator`] consumes the waypoint polyline the oracle
//! returned last and derives remaining distance, a linear time-to-arrival
//! estimate and a progress fraction relative to where navigation started.
//! It holds the only piece of per-session numeric state in the crate; it is
//! reset whenever navigation stops or the destination changes so stale
//! progress math can never run against an obsolete starting distance.

use crate::config::EstimationConfig;
use crate::core::{Point3, Route};
use crate::oracle::{PathOracle, PathQueryResult};
use crate::poi::Poi;

/// One-shot distance report for a POI, used for list display and for
/// emergency-exit ranking.
///
/// Replaces the -1/-2 sentinel encoding: callers must handle the
/// unreachable cases explicitly instead of comparing against magic values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoiDistance {
    /// A connected route exists; value is its length in meters.
    Reachable(f32),

    /// The origin is not on the navigable surface, or the query produced
    /// no usable polyline. Excluded from ranking, never distance 0.
    OffMesh,

    /// The destination is on the mesh but not connected to the origin by
    /// a walkable route.
    Disconnected,
}

impl PoiDistance {
    /// Get the route length, if reachable.
    #[inline]
    pub fn meters(&self) -> Option<f32> {
        match self {
            PoiDistance::Reachable(d) => Some(*d),
            _ => None,
        }
    }
}

/// Path distance and arrival time estimator for one navigation session.
#[derive(Debug, Clone)]
pub struct DistanceEstimator {
    /// Assumed walking speed (m/s).
    walking_speed_mps: f32,

    /// Length of the most recent usable route (meters).
    remaining_distance: f32,

    /// Derived arrival estimate (seconds).
    estimated_duration: f32,

    /// Remaining distance captured on the first usable route after a reset.
    starting_distance: f32,

    /// True once a usable route has been seen for the current session.
    started: bool,
}

impl DistanceEstimator {
    /// Create a new estimator in the inert state.
    pub fn new(config: &EstimationConfig) -> Self {
        Self {
            walking_speed_mps: config.walking_speed_mps,
            remaining_distance: 0.0,
            estimated_duration: 0.0,
            starting_distance: 0.0,
            started: false,
        }
    }

    /// Check if estimation has started (a usable route has been seen).
    #[inline]
    pub fn started(&self) -> bool {
        self.started
    }

    /// Feed the latest route polyline into the estimate.
    ///
    /// Routes with fewer than two waypoints carry no distance information
    /// and leave the stored estimate untouched ("no route", not "zero
    /// distance"). The first usable route after a reset latches the
    /// starting distance used for progress tracking.
    pub fn update_estimation(&mut self, route: &Route) {
        if !route.has_distance_info() {
            return;
        }

        self.remaining_distance = route.total_length();
        self.estimated_duration = self.remaining_distance / self.walking_speed_mps;

        if !self.started {
            self.starting_distance = self.remaining_distance;
            self.started = true;
            log::debug!(
                "Estimation started: {:.2}m to destination",
                self.starting_distance
            );
        }
    }

    /// Clear all session state back to inert.
    ///
    /// Must be called whenever navigation stops or the destination changes.
    pub fn reset_estimation(&mut self) {
        self.started = false;
        self.remaining_distance = 0.0;
        self.estimated_duration = 0.0;
        self.starting_distance = 0.0;
    }

    /// Remaining distance in whole meters (truncated). 0 when not started.
    pub fn remaining_distance_meters(&self) -> u32 {
        if !self.started {
            return 0;
        }
        self.remaining_distance as u32
    }

    /// Remaining duration in whole seconds (truncated). 0 when not started.
    pub fn remaining_duration_seconds(&self) -> u32 {
        if !self.started {
            return 0;
        }
        self.estimated_duration as u32
    }

    /// Fraction of the starting distance already covered, in [0, 1].
    ///
    /// 0 when not started or when the starting distance was zero.
    pub fn progress_fraction(&self) -> f32 {
        if !self.started || self.starting_distance <= 0.0 {
            return 0.0;
        }
        ((self.starting_distance - self.remaining_distance) / self.starting_distance)
            .clamp(0.0, 1.0)
    }

    /// One-shot route-length query from `origin` to a POI's anchor.
    ///
    /// Used for the destination list ("320 m away") and for emergency-exit
    /// ranking. Reports only; never touches the session estimate. `origin`
    /// is `None` when the user is not on the navigable surface.
    pub fn estimate_distance_to_poi<O: PathOracle>(
        &self,
        oracle: &O,
        origin: Option<Point3>,
        poi: &Poi,
    ) -> PoiDistance {
        let Some(origin) = origin else {
            return PoiDistance::OffMesh;
        };

        match oracle.calculate_path(origin, poi.anchor) {
            PathQueryResult::Complete(route) if route.has_distance_info() => {
                PoiDistance::Reachable(route.total_length())
            }
            PathQueryResult::Complete(_) | PathQueryResult::Invalid => PoiDistance::OffMesh,
            PathQueryResult::Partial(_) => PoiDistance::Disconnected,
        }
    }
}
