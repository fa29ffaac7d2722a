//! Notification banners: timed auto-dismiss and the close control.

#[cfg(test)]
#[path = "alerts_test.rs"]
mod alerts_test;

use crate::config::PageConfig;
use crate::dom::{Document, Element, NodeId};
use crate::timers::{TimerQueue, TimerTask};

fn is_alert(el: &Element, config: &PageConfig) -> bool {
    let markers = &config.markers;
    el.has_class(&markers.alert_class) || el.attr("role") == Some(markers.alert_role.as_str())
}

/// Remove `alert` from the document. Returns `false` if it was already gone.
pub fn dismiss(doc: &mut Document, alert: NodeId) -> bool {
    if !doc.is_connected(alert) {
        tracing::trace!(node = ?alert, "alert already dismissed");
        return false;
    }
    match doc.remove(alert) {
        Ok(()) => {
            tracing::debug!(node = ?alert, "alert dismissed");
            true
        }
        Err(err) => {
            tracing::warn!(node = ?alert, %err, "could not dismiss alert");
            false
        }
    }
}

/// Alerts present at initialization, each scheduled for dismissal once.
#[derive(Debug, Clone, Default)]
pub struct AlertDismisser {
    alerts: Vec<NodeId>,
}

impl AlertDismisser {
    /// Find every alert and schedule its dismissal `config.alert_delay()` from now.
    pub fn wire(doc: &Document, config: &PageConfig, timers: &mut TimerQueue) -> Self {
        let alerts = doc.find_all(doc.root(), |el| is_alert(el, config));
        for alert in &alerts {
            timers.schedule(config.alert_delay(), TimerTask::DismissAlert(*alert));
        }
        tracing::debug!(count = alerts.len(), delay_ms = config.alert_delay_ms, "alert dismisser wired");
        Self { alerts }
    }

    #[must_use]
    pub fn alerts(&self) -> &[NodeId] {
        &self.alerts
    }

    /// Handle a click on an alert's close control (or something inside it).
    /// Returns `None` when the click was not on a close control.
    pub fn on_click(&self, doc: &mut Document, target: NodeId, config: &PageConfig) -> Option<bool> {
        let dismiss_target = config.markers.dismiss_target.as_str();
        let control = doc.closest(target, |el| el.attr("data-bs-dismiss") == Some(dismiss_target))?;
        let alert = doc.closest(control, |el| is_alert(el, config))?;
        Some(dismiss(doc, alert))
    }
}
