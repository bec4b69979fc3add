//! Layout state engine for shell-style UIs (header, sidebar, body, infobar,
//! footer).
//!
//! The crate tracks mode state, slot presence and size parameters for one
//! layout instance and derives the geometry and attributes a presentation
//! layer needs. It never renders anything itself.
//!
//! Modules follow a `mod.rs` orchestrator plus private `core` layout:
//! `config` normalizes input, `modes` and `registry` hold state, `geometry`
//! derives output and `engine` wires them behind [`Layout`].

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod registry;

pub use config::{
    NormalizedConfig, PartialConfig, SectionPolicy, SizeParam, SizeParams, normalize,
    normalize_value,
};
pub use engine::{
    EngineOptions, Layout, LayoutEvent, LayoutFrame, LayoutHandle, LayoutObserver,
    LayoutSnapshot, LoggingObserver, NullObserver, ObserverId, SidebarHandle, SidebarScope,
    SlotGuard, SlotRef,
};
pub use error::{LayoutError, Result};
pub use geometry::{
    AttributeMap, CssVariables, Geometry, SidebarGeometry, attribute_map, compute_geometry,
    compute_sidebar_geometry,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{EngineMetrics, MetricSnapshot};
pub use modes::{ModeChange, ModeField, ModeSet, ModeStore, ModeValue, RegionMode};
pub use registry::{
    Region, SidebarPresence, SidebarSlot, SlotKey, SlotLease, SlotPresence, SlotRegistry,
};
