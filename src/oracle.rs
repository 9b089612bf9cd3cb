//! Path oracle contract.
//!
//! The navigation mesh and its pathfinding algorithm live on the host side.
//! This core only depends on a synchronous query: given two points, return a
//! waypoint polyline plus a status. The tagged result forces callers to
//! handle partial and invalid routes explicitly instead of falling through
//! with an unusable polyline.

use crate::core::{Point3, Route};

/// Result of a path query against the navigation mesh.
#[derive(Debug, Clone)]
pub enum PathQueryResult {
    /// A complete walkable route from origin to destination.
    Complete(Route),

    /// The destination lies on the mesh but is not connected to the origin
    /// by a walkable route. The polyline ends somewhere short of the
    /// destination and must never be used as a route.
    Partial(Route),

    /// No route could be computed (origin or destination off the mesh).
    Invalid,
}

impl PathQueryResult {
    /// Check if this is a complete, usable route.
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, PathQueryResult::Complete(_))
    }
}

/// Black-box pathfinder supplied by the host's navigation mesh.
///
/// Must be synchronous from the caller's perspective: the result is
/// available in the same logical step.
pub trait PathOracle {
    /// Compute a route between two points on the navigation mesh.
    fn calculate_path(&self, origin: Point3, destination: Point3) -> PathQueryResult;
}
