use serde::Serialize;

use crate::error::{LayoutError, Result};

pub const THEME_TOKENS: &[&str] = &["light", "dark"];
pub const VISIBILITY_TOKENS: &[&str] = &["visible", "hidden"];
pub const COLLAPSE_TOKENS: &[&str] = &["expanded", "collapsed"];
pub const BAR_TOKENS: &[&str] = &["base", "hidden"];
pub const PANEL_TOKENS: &[&str] = &["base", "hidden", "collapsed"];

/// Colour scheme of the whole shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn token(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Whether a region is shown at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn token(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "visible" => Some(Self::Visible),
            "hidden" => Some(Self::Hidden),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Visible => Self::Hidden,
            Self::Hidden => Self::Visible,
        }
    }
}

/// Reduced-size display state of a collapsible panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collapse {
    #[default]
    Expanded,
    Collapsed,
}

impl Collapse {
    pub fn token(self) -> &'static str {
        match self {
            Self::Expanded => "expanded",
            Self::Collapsed => "collapsed",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "expanded" => Some(Self::Expanded),
            "collapsed" => Some(Self::Collapsed),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Expanded => Self::Collapsed,
            Self::Collapsed => Self::Expanded,
        }
    }
}

/// Three-state-era token for header and footer (`base` | `hidden`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarMode {
    Base,
    Hidden,
}

impl BarMode {
    pub fn token(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Hidden => "hidden",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "base" => Some(Self::Base),
            "hidden" => Some(Self::Hidden),
            _ => None,
        }
    }

    pub fn from_visibility(visibility: Visibility) -> Self {
        match visibility {
            Visibility::Visible => Self::Base,
            Visibility::Hidden => Self::Hidden,
        }
    }

    pub fn visibility(self) -> Visibility {
        match self {
            Self::Base => Visibility::Visible,
            Self::Hidden => Visibility::Hidden,
        }
    }
}

/// Three-state-era token for sidebar and infobar (`base` | `hidden` | `collapsed`).
///
/// Hidden and collapsed are mutually exclusive here, so converting from the
/// split representation lets `hidden` win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelMode {
    Base,
    Hidden,
    Collapsed,
}

impl PanelMode {
    pub fn token(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Hidden => "hidden",
            Self::Collapsed => "collapsed",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "base" => Some(Self::Base),
            "hidden" => Some(Self::Hidden),
            "collapsed" => Some(Self::Collapsed),
            _ => None,
        }
    }

    pub fn from_parts(visibility: Visibility, collapse: Collapse) -> Self {
        match (visibility, collapse) {
            (Visibility::Hidden, _) => Self::Hidden,
            (Visibility::Visible, Collapse::Collapsed) => Self::Collapsed,
            (Visibility::Visible, Collapse::Expanded) => Self::Base,
        }
    }

    /// Split into visibility and collapse. `hidden` carries no collapse
    /// information, so the collapse half is `None`.
    pub fn into_parts(self) -> (Visibility, Option<Collapse>) {
        match self {
            Self::Base => (Visibility::Visible, Some(Collapse::Expanded)),
            Self::Hidden => (Visibility::Hidden, None),
            Self::Collapsed => (Visibility::Visible, Some(Collapse::Collapsed)),
        }
    }
}

/// Identifier of one canonical mode field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModeField {
    Theme,
    HeaderVisible,
    FooterVisible,
    SidebarVisible,
    SidebarCollapsed,
    InfobarVisible,
    InfobarCollapsed,
}

impl ModeField {
    pub const ALL: [ModeField; 7] = [
        ModeField::Theme,
        ModeField::HeaderVisible,
        ModeField::FooterVisible,
        ModeField::SidebarVisible,
        ModeField::SidebarCollapsed,
        ModeField::InfobarVisible,
        ModeField::InfobarCollapsed,
    ];

    /// Config / API key of the field.
    pub fn name(self) -> &'static str {
        match self {
            Self::Theme => "theme",
            Self::HeaderVisible => "headerVisible",
            Self::FooterVisible => "footerVisible",
            Self::SidebarVisible => "sidebarVisible",
            Self::SidebarCollapsed => "sidebarCollapsed",
            Self::InfobarVisible => "infobarVisible",
            Self::InfobarCollapsed => "infobarCollapsed",
        }
    }

    /// Presentation attribute bound to the field.
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Theme => "data-theme-mode",
            Self::HeaderVisible => "data-header-visible-mode",
            Self::FooterVisible => "data-footer-visible-mode",
            Self::SidebarVisible => "data-sidebar-visible-mode",
            Self::SidebarCollapsed => "data-sidebar-collapsed-mode",
            Self::InfobarVisible => "data-infobar-visible-mode",
            Self::InfobarCollapsed => "data-infobar-collapsed-mode",
        }
    }

    pub fn tokens(self) -> &'static [&'static str] {
        match self {
            Self::Theme => THEME_TOKENS,
            Self::HeaderVisible
            | Self::FooterVisible
            | Self::SidebarVisible
            | Self::InfobarVisible => VISIBILITY_TOKENS,
            Self::SidebarCollapsed | Self::InfobarCollapsed => COLLAPSE_TOKENS,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// A typed value for one mode field. Cannot hold an out-of-range token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeValue {
    Theme(ThemeMode),
    HeaderVisible(Visibility),
    FooterVisible(Visibility),
    SidebarVisible(Visibility),
    SidebarCollapsed(Collapse),
    InfobarVisible(Visibility),
    InfobarCollapsed(Collapse),
}

impl ModeValue {
    pub fn field(self) -> ModeField {
        match self {
            Self::Theme(_) => ModeField::Theme,
            Self::HeaderVisible(_) => ModeField::HeaderVisible,
            Self::FooterVisible(_) => ModeField::FooterVisible,
            Self::SidebarVisible(_) => ModeField::SidebarVisible,
            Self::SidebarCollapsed(_) => ModeField::SidebarCollapsed,
            Self::InfobarVisible(_) => ModeField::InfobarVisible,
            Self::InfobarCollapsed(_) => ModeField::InfobarCollapsed,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Theme(theme) => theme.token(),
            Self::HeaderVisible(v)
            | Self::FooterVisible(v)
            | Self::SidebarVisible(v)
            | Self::InfobarVisible(v) => v.token(),
            Self::SidebarCollapsed(c) | Self::InfobarCollapsed(c) => c.token(),
        }
    }

    /// Validate `token` against the enumeration of `field`.
    pub fn parse(field: ModeField, token: &str) -> Result<Self> {
        let value = match field {
            ModeField::Theme => ThemeMode::from_token(token).map(Self::Theme),
            ModeField::HeaderVisible => Visibility::from_token(token).map(Self::HeaderVisible),
            ModeField::FooterVisible => Visibility::from_token(token).map(Self::FooterVisible),
            ModeField::SidebarVisible => Visibility::from_token(token).map(Self::SidebarVisible),
            ModeField::SidebarCollapsed => Collapse::from_token(token).map(Self::SidebarCollapsed),
            ModeField::InfobarVisible => Visibility::from_token(token).map(Self::InfobarVisible),
            ModeField::InfobarCollapsed => Collapse::from_token(token).map(Self::InfobarCollapsed),
        };
        value.ok_or_else(|| LayoutError::InvalidMode {
            field: field.name().to_string(),
            value: token.to_string(),
            expected: field.tokens(),
        })
    }

    /// The other token of the field's two-value enumeration.
    pub fn flipped(self) -> Self {
        match self {
            Self::Theme(theme) => Self::Theme(theme.flipped()),
            Self::HeaderVisible(v) => Self::HeaderVisible(v.flipped()),
            Self::FooterVisible(v) => Self::FooterVisible(v.flipped()),
            Self::SidebarVisible(v) => Self::SidebarVisible(v.flipped()),
            Self::SidebarCollapsed(c) => Self::SidebarCollapsed(c.flipped()),
            Self::InfobarVisible(v) => Self::InfobarVisible(v.flipped()),
            Self::InfobarCollapsed(c) => Self::InfobarCollapsed(c.flipped()),
        }
    }
}

/// Three-state region token as accepted from older configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionMode {
    Header(BarMode),
    Footer(BarMode),
    Sidebar(PanelMode),
    Infobar(PanelMode),
}

impl RegionMode {
    pub const NAMES: [&'static str; 4] = ["header", "footer", "sidebar", "infobar"];

    /// Parse a region-level mode. `Ok(None)` when `name` is not a region name.
    pub fn parse(name: &str, token: &str) -> Result<Option<Self>> {
        let invalid = |expected: &'static [&'static str]| LayoutError::InvalidMode {
            field: name.to_string(),
            value: token.to_string(),
            expected,
        };
        let mode = match name {
            "header" => {
                Self::Header(BarMode::from_token(token).ok_or_else(|| invalid(BAR_TOKENS))?)
            }
            "footer" => {
                Self::Footer(BarMode::from_token(token).ok_or_else(|| invalid(BAR_TOKENS))?)
            }
            "sidebar" => {
                Self::Sidebar(PanelMode::from_token(token).ok_or_else(|| invalid(PANEL_TOKENS))?)
            }
            "infobar" => {
                Self::Infobar(PanelMode::from_token(token).ok_or_else(|| invalid(PANEL_TOKENS))?)
            }
            _ => return Ok(None),
        };
        Ok(Some(mode))
    }

    /// Canonical field values this region mode stands for.
    pub fn values(self) -> Vec<ModeValue> {
        match self {
            Self::Header(bar) => vec![ModeValue::HeaderVisible(bar.visibility())],
            Self::Footer(bar) => vec![ModeValue::FooterVisible(bar.visibility())],
            Self::Sidebar(panel) => {
                let (visibility, collapse) = panel.into_parts();
                let mut values = vec![ModeValue::SidebarVisible(visibility)];
                values.extend(collapse.map(ModeValue::SidebarCollapsed));
                values
            }
            Self::Infobar(panel) => {
                let (visibility, collapse) = panel.into_parts();
                let mut values = vec![ModeValue::InfobarVisible(visibility)];
                values.extend(collapse.map(ModeValue::InfobarCollapsed));
                values
            }
        }
    }
}

/// Snapshot of every mode field. Always fully populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSet {
    pub theme: ThemeMode,
    pub header_visible: Visibility,
    pub footer_visible: Visibility,
    pub sidebar_visible: Visibility,
    pub sidebar_collapsed: Collapse,
    pub infobar_visible: Visibility,
    pub infobar_collapsed: Collapse,
}

impl ModeSet {
    pub fn get(&self, field: ModeField) -> ModeValue {
        match field {
            ModeField::Theme => ModeValue::Theme(self.theme),
            ModeField::HeaderVisible => ModeValue::HeaderVisible(self.header_visible),
            ModeField::FooterVisible => ModeValue::FooterVisible(self.footer_visible),
            ModeField::SidebarVisible => ModeValue::SidebarVisible(self.sidebar_visible),
            ModeField::SidebarCollapsed => ModeValue::SidebarCollapsed(self.sidebar_collapsed),
            ModeField::InfobarVisible => ModeValue::InfobarVisible(self.infobar_visible),
            ModeField::InfobarCollapsed => ModeValue::InfobarCollapsed(self.infobar_collapsed),
        }
    }

    pub fn token(&self, field: ModeField) -> &'static str {
        self.get(field).token()
    }

    pub fn apply(&mut self, value: ModeValue) {
        match value {
            ModeValue::Theme(theme) => self.theme = theme,
            ModeValue::HeaderVisible(v) => self.header_visible = v,
            ModeValue::FooterVisible(v) => self.footer_visible = v,
            ModeValue::SidebarVisible(v) => self.sidebar_visible = v,
            ModeValue::SidebarCollapsed(c) => self.sidebar_collapsed = c,
            ModeValue::InfobarVisible(v) => self.infobar_visible = v,
            ModeValue::InfobarCollapsed(c) => self.infobar_collapsed = c,
        }
    }

    pub fn with(mut self, value: ModeValue) -> Self {
        self.apply(value);
        self
    }

    pub fn is_theme_dark(&self) -> bool {
        self.theme == ThemeMode::Dark
    }

    pub fn is_header_hidden(&self) -> bool {
        self.header_visible == Visibility::Hidden
    }

    pub fn is_footer_hidden(&self) -> bool {
        self.footer_visible == Visibility::Hidden
    }

    pub fn is_sidebar_hidden(&self) -> bool {
        self.sidebar_visible == Visibility::Hidden
    }

    pub fn is_sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed == Collapse::Collapsed
    }

    pub fn is_infobar_hidden(&self) -> bool {
        self.infobar_visible == Visibility::Hidden
    }

    pub fn is_infobar_collapsed(&self) -> bool {
        self.infobar_collapsed == Collapse::Collapsed
    }

    pub fn header_mode(&self) -> BarMode {
        BarMode::from_visibility(self.header_visible)
    }

    pub fn footer_mode(&self) -> BarMode {
        BarMode::from_visibility(self.footer_visible)
    }

    pub fn sidebar_mode(&self) -> PanelMode {
        PanelMode::from_parts(self.sidebar_visible, self.sidebar_collapsed)
    }

    pub fn infobar_mode(&self) -> PanelMode {
        PanelMode::from_parts(self.infobar_visible, self.infobar_collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_parses_its_own_tokens() {
        for field in ModeField::ALL {
            for token in field.tokens() {
                let value = ModeValue::parse(field, token).unwrap();
                assert_eq!(value.field(), field);
                assert_eq!(value.token(), *token);
            }
            assert_eq!(ModeField::parse(field.name()), Some(field));
        }
    }

    #[test]
    fn parse_rejects_foreign_tokens() {
        let err = ModeValue::parse(ModeField::SidebarCollapsed, "hidden").unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidMode { ref field, .. } if field == "sidebarCollapsed"
        ));
    }

    #[test]
    fn panel_mode_prefers_hidden_over_collapsed() {
        assert_eq!(
            PanelMode::from_parts(Visibility::Hidden, Collapse::Collapsed),
            PanelMode::Hidden
        );
        assert_eq!(
            PanelMode::from_parts(Visibility::Visible, Collapse::Collapsed),
            PanelMode::Collapsed
        );
    }

    #[test]
    fn region_mode_expands_to_split_values() {
        let mode = RegionMode::parse("sidebar", "collapsed").unwrap().unwrap();
        assert_eq!(
            mode.values(),
            vec![
                ModeValue::SidebarVisible(Visibility::Visible),
                ModeValue::SidebarCollapsed(Collapse::Collapsed),
            ]
        );

        let hidden = RegionMode::parse("infobar", "hidden").unwrap().unwrap();
        assert_eq!(hidden.values(), vec![ModeValue::InfobarVisible(Visibility::Hidden)]);

        assert!(RegionMode::parse("theme", "dark").unwrap().is_none());
        assert!(RegionMode::parse("header", "collapsed").is_err());
    }

    #[test]
    fn default_mode_set_is_the_baseline() {
        let modes = ModeSet::default();
        assert_eq!(modes.token(ModeField::Theme), "light");
        assert_eq!(modes.sidebar_mode(), PanelMode::Base);
        assert_eq!(modes.header_mode(), BarMode::Base);
        assert!(!modes.is_sidebar_collapsed());
    }
}
