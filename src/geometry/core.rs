use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{SizeParams, ZERO_LENGTH};
use crate::modes::{ModeField, ModeSet};
use crate::registry::{SidebarPresence, SlotPresence};

/// `data-<mode>-mode` attribute name to current token.
pub type AttributeMap = BTreeMap<String, String>;

/// CSS custom property name to length token.
pub type CssVariables = BTreeMap<String, String>;

/// Concrete sizes and attributes for one combination of modes and slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub header_height: String,
    pub footer_height: String,
    pub sidebar_width: String,
    pub infobar_width: String,
    pub transition_duration: String,
    pub sidebar_collapsed_width: String,
    pub infobar_collapsed_width: String,
    pub attributes: AttributeMap,
}

impl Geometry {
    pub fn css_variables(&self) -> CssVariables {
        [
            ("--header-height", &self.header_height),
            ("--footer-height", &self.footer_height),
            ("--sidebar-width", &self.sidebar_width),
            ("--infobar-width", &self.infobar_width),
            ("--transition-duration", &self.transition_duration),
            ("--sidebar-collapsed-width", &self.sidebar_collapsed_width),
            ("--infobar-collapsed-width", &self.infobar_collapsed_width),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
    }
}

/// Derive geometry from a snapshot. Pure: holds no state between calls.
pub fn compute_geometry(
    modes: &ModeSet,
    sizes: &SizeParams,
    presence: &SlotPresence,
) -> Geometry {
    let header_height = bar_length(
        presence.header && !modes.is_header_hidden(),
        &sizes.header_height,
    );
    let footer_height = bar_length(
        presence.footer && !modes.is_footer_hidden(),
        &sizes.footer_height,
    );
    let sidebar_width = panel_width(
        presence.sidebar && !modes.is_sidebar_hidden(),
        modes.is_sidebar_collapsed(),
        &sizes.sidebar_width,
        &sizes.sidebar_collapsed_width,
    );
    let infobar_width = panel_width(
        presence.infobar && !modes.is_infobar_hidden(),
        modes.is_infobar_collapsed(),
        &sizes.infobar_width,
        &sizes.infobar_collapsed_width,
    );

    Geometry {
        header_height,
        footer_height,
        sidebar_width,
        infobar_width,
        transition_duration: sizes.transition_duration.clone(),
        sidebar_collapsed_width: sizes.sidebar_collapsed_width.clone(),
        infobar_collapsed_width: sizes.infobar_collapsed_width.clone(),
        attributes: attribute_map(modes),
    }
}

/// Attribute binding for the root presentation element: one entry per
/// canonical field plus the composite three-state region tokens.
pub fn attribute_map(modes: &ModeSet) -> AttributeMap {
    let mut attributes: AttributeMap = ModeField::ALL
        .into_iter()
        .map(|field| (field.attribute().to_string(), modes.token(field).to_string()))
        .collect();
    for (name, token) in [
        ("data-header-mode", modes.header_mode().token()),
        ("data-footer-mode", modes.footer_mode().token()),
        ("data-sidebar-mode", modes.sidebar_mode().token()),
        ("data-infobar-mode", modes.infobar_mode().token()),
    ] {
        attributes.insert(name.to_string(), token.to_string());
    }
    attributes
}

fn bar_length(shown: bool, length: &str) -> String {
    if shown {
        length.to_string()
    } else {
        ZERO_LENGTH.to_string()
    }
}

fn panel_width(shown: bool, collapsed: bool, full: &str, collapsed_width: &str) -> String {
    match (shown, collapsed) {
        (false, _) => ZERO_LENGTH.to_string(),
        (true, true) => collapsed_width.to_string(),
        (true, false) => full.to_string(),
    }
}

/// Heights inside the sidebar column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarGeometry {
    pub header_height: String,
    pub footer_height: String,
    pub body_height: String,
}

impl SidebarGeometry {
    pub fn css_variables(&self) -> CssVariables {
        [
            ("--sidebar-header-height", &self.header_height),
            ("--sidebar-footer-height", &self.footer_height),
            ("--sidebar-body-height", &self.body_height),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
    }
}

/// The body fills the viewport minus whichever sub-bars are populated.
pub fn compute_sidebar_geometry(
    sizes: &SizeParams,
    presence: &SidebarPresence,
) -> SidebarGeometry {
    // an empty sub-bar contributes 0rem, not its configured height
    let header_height = bar_length(presence.header, &sizes.sidebar_header_height);
    let footer_height = bar_length(presence.footer, &sizes.sidebar_footer_height);
    let body_height = format!("calc(100vh - {header_height} - {footer_height})");
    SidebarGeometry {
        header_height,
        footer_height,
        body_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::{Collapse, ModeValue, ThemeMode, Visibility};

    fn sidebar_only() -> SlotPresence {
        SlotPresence {
            sidebar: true,
            body: true,
            ..SlotPresence::default()
        }
    }

    #[test]
    fn sidebar_width_has_three_exclusive_branches() {
        let sizes = SizeParams::default();
        let base = ModeSet::default();
        let collapsed = base.with(ModeValue::SidebarCollapsed(Collapse::Collapsed));
        let hidden = collapsed.with(ModeValue::SidebarVisible(Visibility::Hidden));

        let full = compute_geometry(&base, &sizes, &sidebar_only());
        assert_eq!(full.sidebar_width, "15.625rem");

        let narrow = compute_geometry(&collapsed, &sizes, &sidebar_only());
        assert_eq!(narrow.sidebar_width, "3.125rem");

        let gone = compute_geometry(&hidden, &sizes, &sidebar_only());
        assert_eq!(gone.sidebar_width, ZERO_LENGTH);

        let absent = compute_geometry(&collapsed, &sizes, &SlotPresence::default());
        assert_eq!(absent.sidebar_width, ZERO_LENGTH);
    }

    #[test]
    fn bars_need_presence_and_visibility() {
        let sizes = SizeParams::default();
        let modes = ModeSet::default().with(ModeValue::FooterVisible(Visibility::Hidden));
        let geometry = compute_geometry(&modes, &sizes, &SlotPresence::all());
        assert_eq!(geometry.header_height, "3.125rem");
        assert_eq!(geometry.footer_height, ZERO_LENGTH);

        let empty = compute_geometry(&ModeSet::default(), &sizes, &SlotPresence::default());
        assert_eq!(empty.header_height, ZERO_LENGTH);
        assert_eq!(empty.transition_duration, "0.1s");
    }

    #[test]
    fn infobar_uses_its_own_sizes() {
        let mut sizes = SizeParams::default();
        sizes.infobar_width = "20rem".into();
        sizes.infobar_collapsed_width = "4rem".into();
        let modes = ModeSet::default().with(ModeValue::InfobarCollapsed(Collapse::Collapsed));
        let geometry = compute_geometry(&modes, &sizes, &SlotPresence::all());
        assert_eq!(geometry.infobar_width, "4rem");
        assert_eq!(geometry.sidebar_width, "15.625rem");
    }

    #[test]
    fn attribute_map_always_carries_theme() {
        let modes = ModeSet::default()
            .with(ModeValue::Theme(ThemeMode::Dark))
            .with(ModeValue::SidebarVisible(Visibility::Hidden))
            .with(ModeValue::SidebarCollapsed(Collapse::Collapsed));
        let attributes = attribute_map(&modes);
        assert_eq!(attributes["data-theme-mode"], "dark");
        assert_eq!(attributes["data-sidebar-visible-mode"], "hidden");
        assert_eq!(attributes["data-sidebar-collapsed-mode"], "collapsed");
        assert_eq!(attributes["data-sidebar-mode"], "hidden");
        assert_eq!(attributes["data-header-mode"], "base");
        assert_eq!(attributes.len(), ModeField::ALL.len() + 4);
    }

    #[test]
    fn css_variables_mirror_geometry() {
        let geometry =
            compute_geometry(&ModeSet::default(), &SizeParams::default(), &sidebar_only());
        let vars = geometry.css_variables();
        assert_eq!(vars["--sidebar-width"], "15.625rem");
        assert_eq!(vars["--header-height"], ZERO_LENGTH);
        assert_eq!(vars["--transition-duration"], "0.1s");
    }

    #[test]
    fn sidebar_body_subtracts_populated_bars() {
        let sizes = SizeParams::default();
        let geometry = compute_sidebar_geometry(
            &sizes,
            &SidebarPresence {
                header: true,
                body: true,
                footer: false,
            },
        );
        assert_eq!(geometry.header_height, "3.125rem");
        assert_eq!(geometry.footer_height, ZERO_LENGTH);
        assert_eq!(geometry.body_height, "calc(100vh - 3.125rem - 0rem)");
        assert_eq!(geometry.css_variables().len(), 3);
    }
}
