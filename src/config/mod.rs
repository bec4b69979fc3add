//! Config normalizer orchestrator.
//!
//! `partial` reads caller input (typed or untyped JSON), `normalize` turns it
//! into a [`NormalizedConfig`] with every field defined.

mod core;
mod normalize;
mod partial;

pub use self::core::{
    DEFAULT_FOOTER_HEIGHT, DEFAULT_HEADER_HEIGHT, DEFAULT_INFOBAR_COLLAPSED_WIDTH,
    DEFAULT_INFOBAR_WIDTH, DEFAULT_SIDEBAR_COLLAPSED_WIDTH, DEFAULT_SIDEBAR_FOOTER_HEIGHT,
    DEFAULT_SIDEBAR_HEADER_HEIGHT, DEFAULT_SIDEBAR_WIDTH, DEFAULT_TRANSITION_DURATION,
    NormalizedConfig, PerRegion, SizeParam, SizeParams, ZERO_LENGTH,
};
pub use normalize::{normalize, normalize_value};
pub use partial::{PartialConfig, PartialModes, PartialRegions, PartialSizes, SectionPolicy};
