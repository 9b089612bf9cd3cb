//! Localization state tracking.
//!
//! The host's tracking layer reports when the device pose is matched
//! against the scanned environment ("position found") and when tracking
//! degrades ("position lost"). The [`LocalizationMonitor`] turns those raw
//! events into the controller's localized flag, a status line for the UI
//! and a one-shot failure notice when relocalization takes too long.

use crate::config::LocalizationConfig;
use crate::controller::NavController;
use crate::sinks::NotificationSink;

/// Shown once, on the very first successful localization of a session.
pub const POSITION_FOUND_NOTICE: &str = "Position found";

/// Shown when relocalization did not succeed within the timeout.
pub const LOCALIZATION_FAILED_NOTICE: &str =
    "Localization is taking longer than expected. Try moving to a well-lit, distinctive area.";

const STATUS_TRACKING: &str = "Position is being tracked";
const STATUS_SCANNING: &str = "Please scan your surroundings";

/// Tracks localization events and the relocalization timeout.
pub struct LocalizationMonitor {
    /// Seconds of lost tracking tolerated before the failure notice.
    timeout_s: f32,

    /// True while the pose is currently tracked.
    localized: bool,

    /// True once any localization succeeded this session.
    ever_localized: bool,

    /// Remaining time on the relocalization countdown, if running.
    countdown: Option<f32>,

    /// Current status line for the UI.
    status: &'static str,
}

impl LocalizationMonitor {
    /// Create a monitor in the not-localized state.
    pub fn new(config: &LocalizationConfig) -> Self {
        Self {
            timeout_s: config.timeout_s,
            localized: false,
            ever_localized: false,
            countdown: None,
            status: STATUS_SCANNING,
        }
    }

    /// Check if the pose is currently tracked.
    pub fn is_localized(&self) -> bool {
        self.localized
    }

    /// Status line for the UI.
    pub fn status(&self) -> &str {
        self.status
    }

    /// Handle a position-found event from the tracking layer.
    ///
    /// Cancels any running relocalization countdown. The user notification
    /// is raised only on the first success of the session; subsequent
    /// relocalizations just restore the status line.
    pub fn on_position_found(
        &mut self,
        controller: &mut NavController,
        notifications: &mut impl NotificationSink,
    ) {
        self.countdown = None;
        self.localized = true;
        self.status = STATUS_TRACKING;
        controller.set_localized(true);

        if !self.ever_localized {
            self.ever_localized = true;
            notifications.notify(POSITION_FOUND_NOTICE);
            log::info!("Initial localization succeeded");
        } else {
            log::debug!("Relocalized");
        }
    }

    /// Handle a position-lost event from the tracking layer.
    ///
    /// Starts the relocalization countdown unless one is already running.
    pub fn on_position_lost(&mut self, controller: &mut NavController) {
        self.localized = false;
        self.status = STATUS_SCANNING;
        controller.set_localized(false);

        if self.countdown.is_none() {
            self.countdown = Some(self.timeout_s);
            log::warn!("Tracking lost, relocalization countdown started");
        }
    }

    /// Advance the relocalization countdown by one frame delta.
    ///
    /// Raises the failure notice exactly once when the countdown expires;
    /// the countdown stays expired until tracking is regained.
    pub fn tick(&mut self, delta_s: f32, notifications: &mut impl NotificationSink) {
        let Some(remaining) = self.countdown else {
            return;
        };

        let remaining = remaining - delta_s;
        if remaining <= 0.0 {
            self.countdown = None;
            notifications.notify(LOCALIZATION_FAILED_NOTICE);
            log::warn!("Relocalization timed out after {:.0}s", self.timeout_s);
        } else {
            self.countdown = Some(remaining);
        }
    }
}
