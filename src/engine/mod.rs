//! Engine facade orchestrator.
//!
//! A [`Layout`] owns one mode store, one slot registry and, while a
//! [`SidebarScope`] is open, the sidebar sub-registry. Collaborators drive it
//! through cloned [`LayoutHandle`]s and follow it through [`LayoutObserver`]s.
//!
//! Mutations are serialized behind a single lock and either commit in full or
//! are rejected. Observers run synchronously after the lock is released, so
//! a value read right after a mutation returns is never stale.

mod audit;
mod core;
mod diagnostics;
mod guard;
mod sidebar;

pub use audit::{LayoutEvent, LayoutObserver, NullObserver, ObserverId, SlotRef};
pub use self::core::{EngineOptions, Layout, LayoutFrame, LayoutHandle, LayoutSnapshot};
pub use diagnostics::LoggingObserver;
pub use guard::SlotGuard;
pub use sidebar::{SidebarHandle, SidebarScope};
