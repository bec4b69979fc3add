//! Engine counters, exported as structured log events.

use crate::logging::{LogEvent, LogFields, LogLevel};
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct EngineMetrics {
    mode_changes: u64,
    toggles: u64,
    size_changes: u64,
    rejected_mutations: u64,
    slot_registrations: u64,
    slot_releases: u64,
    notifications: u64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mode_changes(&mut self, count: usize) {
        self.mode_changes = self.mode_changes.saturating_add(count as u64);
    }

    pub fn record_toggle(&mut self) {
        self.toggles = self.toggles.saturating_add(1);
    }

    pub fn record_size_change(&mut self) {
        self.size_changes = self.size_changes.saturating_add(1);
    }

    pub fn record_rejection(&mut self) {
        self.rejected_mutations = self.rejected_mutations.saturating_add(1);
    }

    pub fn record_registration(&mut self) {
        self.slot_registrations = self.slot_registrations.saturating_add(1);
    }

    pub fn record_release(&mut self) {
        self.slot_releases = self.slot_releases.saturating_add(1);
    }

    pub fn record_notifications(&mut self, delivered: usize) {
        if delivered > 0 {
            self.notifications = self.notifications.saturating_add(delivered as u64);
        }
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            mode_changes: self.mode_changes,
            toggles: self.toggles,
            size_changes: self.size_changes,
            rejected_mutations: self.rejected_mutations,
            slot_registrations: self.slot_registrations,
            slot_releases: self.slot_releases,
            notifications: self.notifications,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub mode_changes: u64,
    pub toggles: u64,
    pub size_changes: u64,
    pub rejected_mutations: u64,
    pub slot_registrations: u64,
    pub slot_releases: u64,
    pub notifications: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "engine_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("mode_changes".to_string(), json!(self.mode_changes));
        map.insert("toggles".to_string(), json!(self.toggles));
        map.insert("size_changes".to_string(), json!(self.size_changes));
        map.insert(
            "rejected_mutations".to_string(),
            json!(self.rejected_mutations),
        );
        map.insert(
            "slot_registrations".to_string(),
            json!(self.slot_registrations),
        );
        map.insert("slot_releases".to_string(), json!(self.slot_releases));
        map.insert("notifications".to_string(), json!(self.notifications));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_saturate_and_export() {
        let mut metrics = EngineMetrics::new();
        metrics.record_toggle();
        metrics.record_mode_changes(2);
        metrics.record_notifications(0);
        metrics.record_notifications(3);
        metrics.record_rejection();

        let snapshot = metrics.snapshot(Duration::from_millis(42));
        assert_eq!(snapshot.toggles, 1);
        assert_eq!(snapshot.mode_changes, 2);
        assert_eq!(snapshot.notifications, 3);

        let event = snapshot.to_log_event("shellframe::metrics");
        assert_eq!(event.message, "engine_metrics");
        assert_eq!(event.fields["uptime_ms"], 42);
        assert_eq!(event.fields["rejected_mutations"], 1);
    }
}
