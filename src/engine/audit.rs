//! Change notifications delivered to layout observers.
//!
//! Every committed mutation that changed state produces one or more
//! [`LayoutEvent`]s. Observers receive each event together with the
//! [`LayoutSnapshot`] taken right after the mutation committed.

use serde_json::{Value, json};

use crate::config::SizeParam;
use crate::modes::ModeField;
use crate::registry::{Region, SidebarSlot, SlotKey};

use super::core::LayoutSnapshot;

/// Address of a slot in either the top-level or the sidebar registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRef {
    Layout(Region),
    Sidebar(SidebarSlot),
}

impl SlotRef {
    /// Dotted path such as `footer` or `sidebar.header`.
    pub fn path(self) -> String {
        match self {
            Self::Layout(region) => region.name().to_string(),
            Self::Sidebar(slot) => format!("sidebar.{}", slot.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEvent {
    ModeChanged {
        field: ModeField,
        from: &'static str,
        to: &'static str,
    },
    SizeChanged {
        param: SizeParam,
        from: String,
        to: String,
    },
    SlotRegistered {
        slot: SlotRef,
    },
    SlotCleared {
        slot: SlotRef,
    },
    ClassNameChanged {
        slot: SlotRef,
        class_name: String,
    },
    SidebarOpened,
    SidebarClosed,
}

impl LayoutEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ModeChanged { .. } => "mode_changed",
            Self::SizeChanged { .. } => "size_changed",
            Self::SlotRegistered { .. } => "slot_registered",
            Self::SlotCleared { .. } => "slot_cleared",
            Self::ClassNameChanged { .. } => "class_name_changed",
            Self::SidebarOpened => "sidebar_opened",
            Self::SidebarClosed => "sidebar_closed",
        }
    }

    /// Structured fields for log output.
    pub fn fields(&self) -> Vec<(String, Value)> {
        match self {
            Self::ModeChanged { field, from, to } => vec![
                ("field".to_string(), json!(field.name())),
                ("from".to_string(), json!(from)),
                ("to".to_string(), json!(to)),
            ],
            Self::SizeChanged { param, from, to } => vec![
                ("param".to_string(), json!(param.key())),
                ("from".to_string(), json!(from)),
                ("to".to_string(), json!(to)),
            ],
            Self::SlotRegistered { slot } | Self::SlotCleared { slot } => {
                vec![("slot".to_string(), json!(slot.path()))]
            }
            Self::ClassNameChanged { slot, class_name } => vec![
                ("slot".to_string(), json!(slot.path())),
                ("class_name".to_string(), json!(class_name)),
            ],
            Self::SidebarOpened | Self::SidebarClosed => Vec::new(),
        }
    }
}

/// Receives layout change notifications.
///
/// Delivery is synchronous and happens with no engine lock held, so an
/// observer may read or mutate the layout through a [`LayoutHandle`]. Events
/// raised that way are queued and delivered after the current one.
///
/// Only one thread delivers at a time. A mutation made on another thread
/// while delivery is running is delivered by the delivering thread, and the
/// mutating call blocks until that has happened. An observer must therefore
/// not wait on a thread that is itself mutating the layout.
///
/// If an observer panics, the panic propagates out of the mutating call.
/// The observer list survives and events still queued at that point are
/// dropped.
///
/// [`LayoutHandle`]: super::LayoutHandle
pub trait LayoutObserver: Send {
    fn on_event(&mut self, event: &LayoutEvent, snapshot: &LayoutSnapshot);
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NullObserver;

impl LayoutObserver for NullObserver {
    fn on_event(&mut self, _event: &LayoutEvent, _snapshot: &LayoutSnapshot) {}
}

impl<F> LayoutObserver for F
where
    F: FnMut(&LayoutEvent, &LayoutSnapshot) + Send,
{
    fn on_event(&mut self, event: &LayoutEvent, snapshot: &LayoutSnapshot) {
        self(event, snapshot)
    }
}

/// Identifies a subscription for [`unsubscribe`](super::LayoutHandle::unsubscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_paths_name_the_registry() {
        assert_eq!(SlotRef::Layout(Region::Footer).path(), "footer");
        assert_eq!(SlotRef::Sidebar(SidebarSlot::Header).path(), "sidebar.header");
    }

    #[test]
    fn mode_change_fields_use_canonical_names() {
        let event = LayoutEvent::ModeChanged {
            field: ModeField::SidebarCollapsed,
            from: "expanded",
            to: "collapsed",
        };
        assert_eq!(event.name(), "mode_changed");
        let fields = event.fields();
        assert_eq!(fields[0], ("field".to_string(), json!("sidebarCollapsed")));
        assert_eq!(fields[2].1, json!("collapsed"));
    }
}
