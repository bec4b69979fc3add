use crate::error::Result;
use crate::registry::{Region, SidebarSlot, SlotLease};

use super::audit::SlotRef;
use super::core::LayoutHandle;
use super::sidebar::SidebarHandle;

#[derive(Debug)]
enum Holder {
    Layout(LayoutHandle, Region),
    Sidebar(SidebarHandle, SidebarSlot),
}

/// Holds one slot registration. Dropping the guard releases it, unless a
/// newer registration has replaced it in the meantime.
#[derive(Debug)]
#[must_use = "dropping the guard releases the slot"]
pub struct SlotGuard {
    holder: Holder,
    lease: SlotLease,
    released: bool,
}

impl SlotGuard {
    pub(crate) fn layout(handle: LayoutHandle, region: Region, lease: SlotLease) -> Self {
        Self {
            holder: Holder::Layout(handle, region),
            lease,
            released: false,
        }
    }

    pub(crate) fn sidebar(handle: SidebarHandle, slot: SidebarSlot, lease: SlotLease) -> Self {
        Self {
            holder: Holder::Sidebar(handle, slot),
            lease,
            released: false,
        }
    }

    pub fn slot(&self) -> SlotRef {
        match &self.holder {
            Holder::Layout(_, region) => SlotRef::Layout(*region),
            Holder::Sidebar(_, slot) => SlotRef::Sidebar(*slot),
        }
    }

    pub fn lease(&self) -> SlotLease {
        self.lease
    }

    /// Release now. Returns whether the slot was cleared; false when a newer
    /// registration owns it.
    pub fn release(mut self) -> Result<bool> {
        self.released = true;
        self.release_inner()
    }

    fn release_inner(&self) -> Result<bool> {
        match &self.holder {
            Holder::Layout(handle, region) => handle.release_slot(*region, self.lease),
            Holder::Sidebar(handle, slot) => handle.release_slot(*slot, self.lease),
        }
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        if !self.released {
            // the layout or sidebar may already be gone
            let _ = self.release_inner();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::NormalizedConfig;
    use crate::engine::Layout;
    use crate::error::LayoutError;
    use crate::registry::{Region, SidebarSlot};

    #[test]
    fn dropping_the_guard_releases_the_slot() {
        let layout = Layout::new(NormalizedConfig::default());
        {
            let _footer = layout.acquire_slot(Region::Footer, "status", "dim").unwrap();
            assert!(layout.has_footer().unwrap());
            assert_eq!(layout.class_name(Region::Footer).unwrap(), "dim");
        }
        assert!(!layout.has_footer().unwrap());
        assert_eq!(layout.class_name(Region::Footer).unwrap(), "");
    }

    #[test]
    fn stale_guard_leaves_newer_registration() {
        let layout = Layout::new(NormalizedConfig::default());
        let old = layout.acquire_slot(Region::Header, "v1", "").unwrap();
        let new = layout.acquire_slot(Region::Header, "v2", "").unwrap();

        drop(old);
        assert_eq!(layout.slot_content(Region::Header).unwrap().as_deref(), Some("v2"));

        assert!(new.release().unwrap());
        assert!(!layout.presence().unwrap().header);
    }

    #[test]
    fn guard_outliving_the_layout_is_harmless() {
        let layout = Layout::new(NormalizedConfig::default());
        let guard = layout.acquire_slot(Region::Body, "page", "").unwrap();
        drop(layout);
        assert_eq!(guard.release().unwrap_err(), LayoutError::NoActiveLayout);
    }

    #[test]
    fn sidebar_guard_from_closed_scope_does_not_touch_new_scope() {
        let layout = Layout::new(NormalizedConfig::default());
        let first = layout.open_sidebar().unwrap();
        let guard = first.acquire_slot(SidebarSlot::Footer, "old", "").unwrap();
        drop(first);

        let second = layout.open_sidebar().unwrap();
        second.register_slot(SidebarSlot::Footer, "new", "").unwrap();
        drop(guard);

        assert_eq!(
            second.slot_content(SidebarSlot::Footer).unwrap().as_deref(),
            Some("new")
        );
        assert!(layout.has_sidebar().unwrap());
    }
}
