//! Outbound seams to the presentation layer.
//!
//! The estimation core never renders anything itself; it pushes
//! fire-and-forget events through these traits. Implementations must not
//! block the caller.

use crate::poi::PoiId;

/// Surface a short user-facing message (toast/banner style).
///
/// No acknowledgement, no queuing contract beyond not blocking.
pub trait NotificationSink {
    fn notify(&mut self, message: &str);
}

/// Toggle display of a POI marker. Idempotent; the core never reads
/// visibility back.
pub trait VisibilitySink {
    fn set_visible(&mut self, poi: PoiId, visible: bool);
}
