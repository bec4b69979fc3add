use serde_json::json;

use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};

use super::audit::{LayoutEvent, LayoutObserver};
use super::core::LayoutSnapshot;

/// Mirrors layout events to a [`Logger`].
pub struct LoggingObserver {
    logger: Logger,
    level: LogLevel,
    target: String,
    log_modes: bool,
    log_sizes: bool,
    log_slots: bool,
    log_geometry: bool,
}

impl LoggingObserver {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            level: LogLevel::Debug,
            target: "shellframe::engine.events".to_string(),
            log_modes: true,
            log_sizes: true,
            log_slots: true,
            log_geometry: false,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn log_modes(mut self, enabled: bool) -> Self {
        self.log_modes = enabled;
        self
    }

    pub fn log_sizes(mut self, enabled: bool) -> Self {
        self.log_sizes = enabled;
        self
    }

    pub fn log_slots(mut self, enabled: bool) -> Self {
        self.log_slots = enabled;
        self
    }

    /// Attach the resulting sidebar and infobar widths to every event.
    pub fn log_geometry(mut self, enabled: bool) -> Self {
        self.log_geometry = enabled;
        self
    }

    fn wants(&self, event: &LayoutEvent) -> bool {
        match event {
            LayoutEvent::ModeChanged { .. } => self.log_modes,
            LayoutEvent::SizeChanged { .. } => self.log_sizes,
            LayoutEvent::SlotRegistered { .. }
            | LayoutEvent::SlotCleared { .. }
            | LayoutEvent::ClassNameChanged { .. } => self.log_slots,
            LayoutEvent::SidebarOpened | LayoutEvent::SidebarClosed => true,
        }
    }
}

impl LayoutObserver for LoggingObserver {
    fn on_event(&mut self, event: &LayoutEvent, snapshot: &LayoutSnapshot) {
        if !self.wants(event) {
            return;
        }
        let mut fields = event.fields();
        if self.log_geometry {
            fields.push(json_kv(
                "sidebar_width",
                json!(snapshot.geometry.sidebar_width),
            ));
            fields.push(json_kv(
                "infobar_width",
                json!(snapshot.geometry.infobar_width),
            ));
        }
        let entry = event_with_fields(self.level, &self.target, event.name(), fields);
        let _ = self.logger.log_event(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizedConfig;
    use crate::engine::Layout;
    use crate::logging::MemorySink;
    use crate::registry::Region;

    #[test]
    fn mirrors_selected_events() {
        let sink = MemorySink::new();
        let layout = Layout::new(NormalizedConfig::default());
        layout
            .subscribe(
                LoggingObserver::new(Logger::new(sink.clone()))
                    .log_slots(false)
                    .log_geometry(true),
            )
            .unwrap();

        layout.register_slot(Region::Sidebar, "nav", "").unwrap();
        layout.toggle_sidebar_collapsed_mode().unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "mode_changed");
        assert_eq!(events[0].target, "shellframe::engine.events");
        assert_eq!(events[0].fields["to"], "collapsed");
        assert_eq!(events[0].fields["sidebar_width"], "3.125rem");
    }
}
