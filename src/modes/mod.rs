//! Mode module orchestrator.
//!
//! The canonical schema is split: every field is binary, so toggling is an
//! involution. The three-state `base|hidden|collapsed` tokens survive as
//! adapters (`BarMode`, `PanelMode`, `RegionMode`).

mod core;
mod store;

pub use self::core::{
    BAR_TOKENS, BarMode, COLLAPSE_TOKENS, Collapse, ModeField, ModeSet, ModeValue, PANEL_TOKENS,
    PanelMode, RegionMode, THEME_TOKENS, ThemeMode, VISIBILITY_TOKENS, Visibility,
};
pub use store::{ModeChange, ModeStore};
