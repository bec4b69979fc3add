//! Derived geometry: pure functions from modes, sizes and slot presence to
//! concrete lengths and presentation attributes.

mod core;

pub use self::core::{
    AttributeMap, CssVariables, Geometry, SidebarGeometry, attribute_map, compute_geometry,
    compute_sidebar_geometry,
};
