//! Configuration loading for disha-nav.

use crate::error::{NavError, Result};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize, Default)]
pub struct NavConfig {
    #[serde(default)]
    pub estimation: EstimationConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub emergency: EmergencyConfig,
    #[serde(default)]
    pub localization: LocalizationConfig,
}

/// Distance/time estimation parameters
#[derive(Clone, Debug, Deserialize)]
pub struct EstimationConfig {
    /// Assumed walking speed in m/s (default: 0.45).
    ///
    /// Deliberately below the ~1.34 m/s average human walking speed so
    /// arrival times are not underestimated while the user stops, scans
    /// or hesitates along the route.
    #[serde(default = "default_walking_speed")]
    pub walking_speed_mps: f32,
}

/// Path recompute throttling
#[derive(Clone, Debug, Deserialize)]
pub struct SchedulerConfig {
    /// Minimum wall-clock time between oracle queries in seconds
    /// (default: 0.1). The readout itself refreshes every tick.
    #[serde(default = "default_recompute_interval")]
    pub recompute_interval_s: f32,
}

/// Navigation controller parameters
#[derive(Clone, Debug, Deserialize)]
pub struct ControllerConfig {
    /// Distance to the destination anchor that counts as arrival, in
    /// meters (default: 1.0).
    #[serde(default = "default_arrival_radius")]
    pub arrival_radius_m: f32,
}

/// Emergency-mode retargeting parameters
#[derive(Clone, Debug, Deserialize)]
pub struct EmergencyConfig {
    /// Re-evaluation interval when the user is standing still, in seconds
    /// (default: 3.0).
    #[serde(default = "default_eval_interval_slow")]
    pub eval_interval_slow_s: f32,

    /// Re-evaluation interval at or above the reference speed, in seconds
    /// (default: 0.5).
    #[serde(default = "default_eval_interval_fast")]
    pub eval_interval_fast_s: f32,

    /// Speed at which the fast interval is reached, in m/s (default: 5.0).
    #[serde(default = "default_reference_speed")]
    pub reference_speed_mps: f32,

    /// Distance to the targeted exit that counts as arrival, in meters
    /// (default: 1.0).
    #[serde(default = "default_arrival_radius")]
    pub arrival_radius_m: f32,

    /// Consecutive ranking cycles without any reachable exit before a
    /// single user-facing diagnostic is raised (default: 5).
    #[serde(default = "default_unreachable_notice_after")]
    pub unreachable_notice_after: u32,
}

/// Localization monitoring parameters
#[derive(Clone, Debug, Deserialize)]
pub struct LocalizationConfig {
    /// Maximum seconds to wait for (re)localization before telling the
    /// user it failed (default: 10.0).
    #[serde(default = "default_localization_timeout")]
    pub timeout_s: f32,
}

// Default value functions
fn default_walking_speed() -> f32 {
    0.45
}
fn default_recompute_interval() -> f32 {
    0.1
}
fn default_arrival_radius() -> f32 {
    1.0
}
fn default_eval_interval_slow() -> f32 {
    3.0
}
fn default_eval_interval_fast() -> f32 {
    0.5
}
fn default_reference_speed() -> f32 {
    5.0
}
fn default_unreachable_notice_after() -> u32 {
    5
}
fn default_localization_timeout() -> f32 {
    10.0
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            walking_speed_mps: default_walking_speed(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            recompute_interval_s: default_recompute_interval(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            arrival_radius_m: default_arrival_radius(),
        }
    }
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self {
            eval_interval_slow_s: default_eval_interval_slow(),
            eval_interval_fast_s: default_eval_interval_fast(),
            reference_speed_mps: default_reference_speed(),
            arrival_radius_m: default_arrival_radius(),
            unreachable_notice_after: default_unreachable_notice_after(),
        }
    }
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            timeout_s: default_localization_timeout(),
        }
    }
}

impl NavConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavError::Config(format!("Failed to read config file: {}", e)))?;
        let config: NavConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
