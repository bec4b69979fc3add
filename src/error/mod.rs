//! Error surface shared by every engine module.

mod types;

pub use types::{LayoutError, Result};
