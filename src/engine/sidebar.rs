use std::collections::BTreeMap;
use std::ops::Deref;

use crate::error::{LayoutError, Result};
use crate::geometry::{CssVariables, SidebarGeometry, compute_sidebar_geometry};
use crate::metrics::EngineMetrics;
use crate::registry::{SidebarPresence, SidebarSlot, SlotContent, SlotLease, SlotRegistry};

use super::audit::{LayoutEvent, SlotRef};
use super::core::{EngineState, LayoutHandle, clear_from, register_into, set_class_in};
use super::guard::SlotGuard;

#[derive(Debug)]
pub(crate) struct SidebarState {
    pub(crate) scope: u64,
    pub(crate) slots: SlotRegistry<SidebarSlot>,
}

impl SidebarState {
    pub(crate) fn new(scope: u64) -> Self {
        Self {
            scope,
            slots: SlotRegistry::new(),
        }
    }
}

/// An open sidebar. Dropping the scope closes the sidebar sub-registry and
/// every [`SidebarHandle`] taken from it starts failing with
/// [`LayoutError::NoActiveSidebar`].
#[must_use = "dropping the scope closes the sidebar"]
pub struct SidebarScope {
    handle: SidebarHandle,
}

impl SidebarScope {
    pub(crate) fn new(layout: LayoutHandle, scope: u64) -> Self {
        Self {
            handle: SidebarHandle { layout, scope },
        }
    }

    pub fn handle(&self) -> SidebarHandle {
        self.handle.clone()
    }
}

impl Deref for SidebarScope {
    type Target = SidebarHandle;

    fn deref(&self) -> &SidebarHandle {
        &self.handle
    }
}

impl Drop for SidebarScope {
    fn drop(&mut self) {
        let _ = self.handle.close();
    }
}

/// Accessor to the sidebar header/body/footer sub-slots.
#[derive(Debug, Clone)]
pub struct SidebarHandle {
    layout: LayoutHandle,
    scope: u64,
}

impl SidebarHandle {
    pub fn layout(&self) -> &LayoutHandle {
        &self.layout
    }

    /// Whether this handle's scope is still the open one.
    pub fn is_active(&self) -> bool {
        self.read(|_, _| ()).is_ok()
    }

    fn read<T>(&self, read: impl FnOnce(&EngineState, &SidebarState) -> T) -> Result<T> {
        let scope = self.scope;
        self.layout.shared()?.read(|state| {
            state
                .sidebar
                .as_ref()
                .filter(|sidebar| sidebar.scope == scope)
                .map(|sidebar| read(state, sidebar))
                .ok_or(LayoutError::NoActiveSidebar)
        })?
    }

    fn commit<T>(
        &self,
        operation: &'static str,
        mutate: impl FnOnce(&mut SidebarState, &mut Vec<LayoutEvent>) -> T,
    ) -> Result<T> {
        let scope = self.scope;
        self.layout.shared()?.commit(operation, |state, events| {
            let sidebar = state
                .sidebar
                .as_mut()
                .filter(|sidebar| sidebar.scope == scope)
                .ok_or(LayoutError::NoActiveSidebar)?;
            Ok(mutate(sidebar, events))
        })
    }

    pub fn register_slot(
        &self,
        slot: SidebarSlot,
        content: impl Into<SlotContent>,
        class_name: impl Into<String>,
    ) -> Result<SlotLease> {
        let (content, class_name) = (content.into(), class_name.into());
        let lease = self.commit("register_sidebar_slot", |sidebar, events| {
            register_into(
                &mut sidebar.slots,
                slot,
                SlotRef::Sidebar(slot),
                content,
                class_name,
                events,
            )
        })?;
        self.record(EngineMetrics::record_registration);
        Ok(lease)
    }

    pub fn unregister_slot(&self, slot: SidebarSlot) -> Result<bool> {
        let cleared = self.commit("unregister_sidebar_slot", |sidebar, events| {
            clear_from(&mut sidebar.slots, slot, SlotRef::Sidebar(slot), events)
        })?;
        if cleared {
            self.record(EngineMetrics::record_release);
        }
        Ok(cleared)
    }

    /// Clear `slot` only while `lease` is its current registration.
    pub fn release_slot(&self, slot: SidebarSlot, lease: SlotLease) -> Result<bool> {
        let cleared = self.commit("release_sidebar_slot", |sidebar, events| {
            sidebar.slots.lease_of(slot) == Some(lease)
                && clear_from(&mut sidebar.slots, slot, SlotRef::Sidebar(slot), events)
        })?;
        if cleared {
            self.record(EngineMetrics::record_release);
        }
        Ok(cleared)
    }

    pub fn set_slot(
        &self,
        slot: SidebarSlot,
        content: Option<SlotContent>,
    ) -> Result<Option<SlotLease>> {
        let Some(content) = content else {
            return self.unregister_slot(slot).map(|_| None);
        };
        let lease = self.commit("set_sidebar_slot", |sidebar, events| {
            let class_name = sidebar.slots.class_name(slot).to_string();
            register_into(
                &mut sidebar.slots,
                slot,
                SlotRef::Sidebar(slot),
                content,
                class_name,
                events,
            )
        })?;
        self.record(EngineMetrics::record_registration);
        Ok(Some(lease))
    }

    pub fn set_class_name(
        &self,
        slot: SidebarSlot,
        class_name: impl Into<String>,
    ) -> Result<bool> {
        let class_name = class_name.into();
        self.commit("set_sidebar_class_name", |sidebar, events| {
            set_class_in(
                &mut sidebar.slots,
                slot,
                SlotRef::Sidebar(slot),
                class_name,
                events,
            )
        })
    }

    /// Register and hold `slot` for the lifetime of the returned guard.
    pub fn acquire_slot(
        &self,
        slot: SidebarSlot,
        content: impl Into<SlotContent>,
        class_name: impl Into<String>,
    ) -> Result<SlotGuard> {
        let lease = self.register_slot(slot, content, class_name)?;
        Ok(SlotGuard::sidebar(self.clone(), slot, lease))
    }

    pub fn presence(&self) -> Result<SidebarPresence> {
        self.read(|_, sidebar| sidebar.slots.presence())
    }

    pub fn has_header(&self) -> Result<bool> {
        self.read(|_, sidebar| sidebar.slots.is_present(SidebarSlot::Header))
    }

    pub fn has_body(&self) -> Result<bool> {
        self.read(|_, sidebar| sidebar.slots.is_present(SidebarSlot::Body))
    }

    pub fn has_footer(&self) -> Result<bool> {
        self.read(|_, sidebar| sidebar.slots.is_present(SidebarSlot::Footer))
    }

    pub fn slot_content(&self, slot: SidebarSlot) -> Result<Option<SlotContent>> {
        self.read(|_, sidebar| sidebar.slots.content(slot).map(str::to_string))
    }

    pub fn class_names(&self) -> Result<BTreeMap<String, String>> {
        self.read(|_, sidebar| sidebar.slots.class_name_map())
    }

    pub fn geometry(&self) -> Result<SidebarGeometry> {
        self.read(|state, sidebar| {
            compute_sidebar_geometry(&state.sizes, &sidebar.slots.presence())
        })
    }

    pub fn css_variables(&self) -> Result<CssVariables> {
        self.geometry().map(|geometry| geometry.css_variables())
    }

    /// Close the scope early. Returns false when it was already closed.
    pub(crate) fn close(&self) -> Result<bool> {
        let scope = self.scope;
        self.layout.shared()?.commit("close_sidebar", |state, events| {
            if state.sidebar.as_ref().is_none_or(|sidebar| sidebar.scope != scope) {
                return Ok(false);
            }
            state.sidebar = None;
            events.push(LayoutEvent::SidebarClosed);
            Ok(true)
        })
    }

    fn record(&self, update: impl FnOnce(&mut EngineMetrics)) {
        if let Ok(shared) = self.layout.shared() {
            shared.record(update);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NormalizedConfig, SizeParam};
    use crate::engine::Layout;

    #[test]
    fn sub_slots_make_the_sidebar_present() {
        let layout = Layout::new(NormalizedConfig::default());
        assert!(!layout.presence().unwrap().sidebar);

        let sidebar = layout.open_sidebar().unwrap();
        assert!(!layout.has_sidebar().unwrap());
        sidebar.register_slot(SidebarSlot::Body, "menu", "").unwrap();
        assert!(layout.has_sidebar().unwrap());
        assert_eq!(layout.geometry().unwrap().sidebar_width, "15.625rem");

        sidebar.unregister_slot(SidebarSlot::Body).unwrap();
        assert!(!layout.has_sidebar().unwrap());
    }

    #[test]
    fn closed_scope_rejects_access() {
        let layout = Layout::new(NormalizedConfig::default());
        let scope = layout.open_sidebar().unwrap();
        let handle = scope.handle();
        handle.register_slot(SidebarSlot::Header, "brand", "").unwrap();
        drop(scope);

        assert!(!handle.is_active());
        assert_eq!(handle.presence().unwrap_err(), LayoutError::NoActiveSidebar);
        assert_eq!(
            handle.register_slot(SidebarSlot::Footer, "user", "").unwrap_err(),
            LayoutError::NoActiveSidebar
        );
        assert!(!layout.presence().unwrap().sidebar);
    }

    #[test]
    fn reopening_invalidates_the_previous_scope() {
        let layout = Layout::new(NormalizedConfig::default());
        let first = layout.open_sidebar().unwrap();
        let second = layout.open_sidebar().unwrap();

        assert!(!first.is_active());
        assert!(second.is_active());
        drop(first);
        assert!(second.is_active());
    }

    #[test]
    fn sidebar_handle_reports_a_dropped_layout() {
        let layout = Layout::new(NormalizedConfig::default());
        let handle = layout.open_sidebar().unwrap().handle();
        drop(layout);
        assert_eq!(handle.presence().unwrap_err(), LayoutError::NoActiveLayout);
    }

    #[test]
    fn body_height_subtracts_populated_bars() {
        let layout = Layout::new(NormalizedConfig::default());
        layout.set_size(SizeParam::SidebarHeaderHeight, "4rem").unwrap();
        let sidebar = layout.open_sidebar().unwrap();
        sidebar.register_slot(SidebarSlot::Header, "brand", "").unwrap();

        let geometry = sidebar.geometry().unwrap();
        assert_eq!(geometry.header_height, "4rem");
        assert_eq!(geometry.footer_height, "0rem");
        assert_eq!(geometry.body_height, "calc(100vh - 4rem - 0rem)");

        let frame_vars = layout.css_variables().unwrap();
        assert_eq!(frame_vars["--sidebar-header-height"], "4rem");
        assert_eq!(frame_vars["--sidebar-footer-height"], "0rem");
    }

    #[test]
    fn set_slot_keeps_the_sub_slot_class() {
        let layout = Layout::new(NormalizedConfig::default());
        let sidebar = layout.open_sidebar().unwrap();
        sidebar.set_class_name(SidebarSlot::Footer, "account").unwrap();

        let lease = sidebar
            .set_slot(SidebarSlot::Footer, Some("user".to_string()))
            .unwrap();
        assert!(lease.is_some());
        assert!(sidebar.has_footer().unwrap());
        assert_eq!(sidebar.class_names().unwrap()["footer"], "account");

        assert_eq!(sidebar.set_slot(SidebarSlot::Footer, None).unwrap(), None);
        assert!(!sidebar.has_footer().unwrap());
        assert_eq!(sidebar.class_names().unwrap()["footer"], "");
    }
}
