use crate::modes::ModeSet;

use super::core::{Region, SlotKey};

/// Join class fragments with single spaces, skipping empty ones.
pub fn compose_classes<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep the names whose flag is set.
pub fn conditional_classes<'a, I>(flags: I) -> String
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    compose_classes(
        flags
            .into_iter()
            .filter_map(|(name, enabled)| enabled.then_some(name)),
    )
}

/// Presentation classes of a region: its name, the active mode modifiers,
/// then whatever the collaborator supplied.
pub fn region_classes(region: Region, modes: &ModeSet, user_class: &str) -> String {
    let (hidden, collapsed) = match region {
        Region::Header => (modes.is_header_hidden(), false),
        Region::Footer => (modes.is_footer_hidden(), false),
        Region::Sidebar => (modes.is_sidebar_hidden(), modes.is_sidebar_collapsed()),
        Region::Infobar => (modes.is_infobar_hidden(), modes.is_infobar_collapsed()),
        Region::Body => (false, false),
    };
    let modifiers = conditional_classes([("hidden", hidden), ("collapsed", collapsed)]);
    compose_classes([region.name(), modifiers.as_str(), user_class])
}
