use thiserror::Error;

/// Unified result type for the shellframe crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced by the layout state engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has no content: register the `body` slot before finalizing")]
    MissingContent,
    #[error("no active layout: the handle outlived its layout instance")]
    NoActiveLayout,
    #[error("no active sidebar: the handle outlived its sidebar scope")]
    NoActiveSidebar,
    #[error(
        "invalid value `{value}` for mode `{field}` (expected one of: {})",
        expected.join(", ")
    )]
    InvalidMode {
        field: String,
        value: String,
        expected: &'static [&'static str],
    },
    #[error("unknown mode field `{0}`")]
    UnknownModeField(String),
    #[error("conflicting values for mode `{field}`: `{first}` vs `{second}`")]
    ConflictingModes {
        field: String,
        first: String,
        second: String,
    },
    #[error("config section `{section}` must be an object, found {found}")]
    MalformedSection { section: String, found: String },
    #[error("config field `{section}.{field}` is malformed: {found}")]
    MalformedField {
        section: String,
        field: String,
        found: String,
    },
    #[error("unknown size parameter `{0}`")]
    UnknownSizeParam(String),
    #[error("size parameter `{0}` cannot be empty")]
    EmptySize(String),
    #[error("unknown slot `{0}`")]
    UnknownSlot(String),
    #[error("layout state lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_mode_lists_expected_tokens() {
        let err = LayoutError::InvalidMode {
            field: "theme".into(),
            value: "sepia".into(),
            expected: &["light", "dark"],
        };
        assert_eq!(
            err.to_string(),
            "invalid value `sepia` for mode `theme` (expected one of: light, dark)"
        );
    }
}
