//! Slot registry orchestrator.
//!
//! A slot is populated while a collaborator has content registered for it.
//! Presence never depends on the modes: a hidden region can still be
//! populated.

mod classes;
mod core;

pub use classes::{compose_classes, conditional_classes, region_classes};
pub use self::core::{
    Region, SidebarPresence, SidebarSlot, SlotContent, SlotEntry, SlotKey, SlotLease,
    SlotPresence, SlotRegistration, SlotRegistry,
};
