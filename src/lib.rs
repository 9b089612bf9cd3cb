//! DishaNav - Estimation core for AR indoor navigation
//!
//! # Architecture
//!
//! The crate is organized into 3 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │          controller / emergency / localization      │  ← Session control
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │          estimation / scheduler / poi               │  ← Core algorithms
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │          core / oracle / sinks / config / error     │  ← Foundation
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The host engine owns the navigation mesh, the rendered path and the UI
//! widgets; this crate owns the numbers and the decisions. Per frame the
//! host hands in a delta time and the user's position on the mesh, and
//! gets back a [`NavReadout`] to display. Path geometry is obtained
//! through the [`PathOracle`] seam; user-visible side effects go through
//! the [`NotificationSink`] and [`VisibilitySink`] seams.
//!
//! # Components
//!
//! - [`DistanceEstimator`]: remaining distance, time-to-arrival and
//!   progress over the latest route polyline
//! - [`RecomputeScheduler`]: throttles oracle queries to a fixed interval
//!   independent of the display rate
//! - [`NavController`]: destination ownership, arrival detection and the
//!   per-frame readout
//! - [`EmergencyRetargeter`]: speed-paced re-ranking of emergency exits
//!   while emergency mode is active
//! - [`LocalizationMonitor`]: tracking events, status line and the
//!   relocalization timeout

// Layer 1: Foundation (no internal deps)
pub mod config;
pub mod core;
pub mod error;
pub mod oracle;
pub mod sinks;

// Layer 2: Core algorithms
pub mod estimation;
pub mod poi;
pub mod scheduler;

// Layer 3: Session control
pub mod controller;
pub mod emergency;
pub mod localization;

// Convenience re-exports (flat namespace for common use)
pub use config::{
    ControllerConfig, EmergencyConfig, EstimationConfig, LocalizationConfig, NavConfig,
    SchedulerConfig,
};
pub use controller::{NavController, NavReadout, ARRIVED_NOTICE, ROUTE_UNREACHABLE_NOTICE};
pub use core::{Point3, Route};
pub use emergency::{EmergencyRetargeter, NO_REACHABLE_EXIT_NOTICE};
pub use error::{NavError, Result};
pub use estimation::{DistanceEstimator, PoiDistance};
pub use localization::{
    LocalizationMonitor, LOCALIZATION_FAILED_NOTICE, POSITION_FOUND_NOTICE,
};
pub use oracle::{PathOracle, PathQueryResult};
pub use poi::{Poi, PoiId, PoiKind, Space};
pub use scheduler::RecomputeScheduler;
pub use sinks::{NotificationSink, VisibilitySink};
