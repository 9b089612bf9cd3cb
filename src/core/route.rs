//! Route types for navigation.
//!
//! A [`Route`] is the output of the path oracle - an ordered polyline of
//! waypoints from the user's position to a destination anchor. Routes are
//! produced fresh on every oracle query and never mutated afterwards.

use serde::{Deserialize, Serialize};

use super::Point3;

/// A computed route as a waypoint polyline.
///
/// - `waypoints[0]` is at or near the query origin
/// - `waypoints[len-1]` is at or near the destination anchor
///
/// A route with fewer than two waypoints carries no distance information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Route {
    waypoints: Vec<Point3>,
}

impl Route {
    /// Create a route from waypoints.
    pub fn new(waypoints: Vec<Point3>) -> Self {
        Self { waypoints }
    }

    /// Create an empty route (no waypoints).
    pub fn empty() -> Self {
        Self {
            waypoints: Vec::new(),
        }
    }

    /// Get the waypoint polyline.
    #[inline]
    pub fn waypoints(&self) -> &[Point3] {
        &self.waypoints
    }

    /// Get the number of waypoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Check if the route has no waypoints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Check if the route carries distance information (>= 2 waypoints).
    #[inline]
    pub fn has_distance_info(&self) -> bool {
        self.waypoints.len() >= 2
    }

    /// Total polyline length in meters.
    ///
    /// Sum of Euclidean distances between consecutive waypoints.
    /// Returns 0.0 for routes with fewer than two waypoints.
    pub fn total_length(&self) -> f32 {
        if self.waypoints.len() < 2 {
            return 0.0;
        }

        self.waypoints
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }
}
