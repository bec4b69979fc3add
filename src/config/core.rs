use serde::Serialize;

use crate::error::{LayoutError, Result};
use crate::modes::ModeSet;
use crate::registry::{Region, SlotContent};

/// Length emitted for an absent or hidden region.
pub const ZERO_LENGTH: &str = "0rem";

pub const DEFAULT_HEADER_HEIGHT: &str = "3.125rem";
pub const DEFAULT_FOOTER_HEIGHT: &str = "3.125rem";
pub const DEFAULT_SIDEBAR_WIDTH: &str = "15.625rem";
pub const DEFAULT_SIDEBAR_COLLAPSED_WIDTH: &str = "3.125rem";
pub const DEFAULT_SIDEBAR_HEADER_HEIGHT: &str = "3.125rem";
pub const DEFAULT_SIDEBAR_FOOTER_HEIGHT: &str = "3.125rem";
pub const DEFAULT_INFOBAR_WIDTH: &str = "15.625rem";
pub const DEFAULT_INFOBAR_COLLAPSED_WIDTH: &str = "3.125rem";
pub const DEFAULT_TRANSITION_DURATION: &str = "0.1s";

/// Named size parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizeParam {
    HeaderHeight,
    FooterHeight,
    SidebarWidth,
    SidebarCollapsedWidth,
    SidebarHeaderHeight,
    SidebarFooterHeight,
    InfobarWidth,
    InfobarCollapsedWidth,
    TransitionDuration,
}

impl SizeParam {
    pub const ALL: [SizeParam; 9] = [
        SizeParam::HeaderHeight,
        SizeParam::FooterHeight,
        SizeParam::SidebarWidth,
        SizeParam::SidebarCollapsedWidth,
        SizeParam::SidebarHeaderHeight,
        SizeParam::SidebarFooterHeight,
        SizeParam::InfobarWidth,
        SizeParam::InfobarCollapsedWidth,
        SizeParam::TransitionDuration,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::HeaderHeight => "headerHeight",
            Self::FooterHeight => "footerHeight",
            Self::SidebarWidth => "sidebarWidth",
            Self::SidebarCollapsedWidth => "sidebarCollapsedWidth",
            Self::SidebarHeaderHeight => "sidebarHeaderHeight",
            Self::SidebarFooterHeight => "sidebarFooterHeight",
            Self::InfobarWidth => "infobarWidth",
            Self::InfobarCollapsedWidth => "infobarCollapsedWidth",
            Self::TransitionDuration => "transitionDuration",
        }
    }

    pub fn default_value(self) -> &'static str {
        match self {
            Self::HeaderHeight => DEFAULT_HEADER_HEIGHT,
            Self::FooterHeight => DEFAULT_FOOTER_HEIGHT,
            Self::SidebarWidth => DEFAULT_SIDEBAR_WIDTH,
            Self::SidebarCollapsedWidth => DEFAULT_SIDEBAR_COLLAPSED_WIDTH,
            Self::SidebarHeaderHeight => DEFAULT_SIDEBAR_HEADER_HEIGHT,
            Self::SidebarFooterHeight => DEFAULT_SIDEBAR_FOOTER_HEIGHT,
            Self::InfobarWidth => DEFAULT_INFOBAR_WIDTH,
            Self::InfobarCollapsedWidth => DEFAULT_INFOBAR_COLLAPSED_WIDTH,
            Self::TransitionDuration => DEFAULT_TRANSITION_DURATION,
        }
    }

    pub fn parse(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|param| param.key() == key)
            .ok_or_else(|| LayoutError::UnknownSizeParam(key.to_string()))
    }
}

/// Fully defaulted size parameters. Values are opaque length tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeParams {
    pub header_height: String,
    pub footer_height: String,
    pub sidebar_width: String,
    pub sidebar_collapsed_width: String,
    pub sidebar_header_height: String,
    pub sidebar_footer_height: String,
    pub infobar_width: String,
    pub infobar_collapsed_width: String,
    pub transition_duration: String,
}

impl Default for SizeParams {
    fn default() -> Self {
        Self {
            header_height: DEFAULT_HEADER_HEIGHT.to_string(),
            footer_height: DEFAULT_FOOTER_HEIGHT.to_string(),
            sidebar_width: DEFAULT_SIDEBAR_WIDTH.to_string(),
            sidebar_collapsed_width: DEFAULT_SIDEBAR_COLLAPSED_WIDTH.to_string(),
            sidebar_header_height: DEFAULT_SIDEBAR_HEADER_HEIGHT.to_string(),
            sidebar_footer_height: DEFAULT_SIDEBAR_FOOTER_HEIGHT.to_string(),
            infobar_width: DEFAULT_INFOBAR_WIDTH.to_string(),
            infobar_collapsed_width: DEFAULT_INFOBAR_COLLAPSED_WIDTH.to_string(),
            transition_duration: DEFAULT_TRANSITION_DURATION.to_string(),
        }
    }
}

impl SizeParams {
    pub fn get(&self, param: SizeParam) -> &str {
        match param {
            SizeParam::HeaderHeight => &self.header_height,
            SizeParam::FooterHeight => &self.footer_height,
            SizeParam::SidebarWidth => &self.sidebar_width,
            SizeParam::SidebarCollapsedWidth => &self.sidebar_collapsed_width,
            SizeParam::SidebarHeaderHeight => &self.sidebar_header_height,
            SizeParam::SidebarFooterHeight => &self.sidebar_footer_height,
            SizeParam::InfobarWidth => &self.infobar_width,
            SizeParam::InfobarCollapsedWidth => &self.infobar_collapsed_width,
            SizeParam::TransitionDuration => &self.transition_duration,
        }
    }

    fn slot_mut(&mut self, param: SizeParam) -> &mut String {
        match param {
            SizeParam::HeaderHeight => &mut self.header_height,
            SizeParam::FooterHeight => &mut self.footer_height,
            SizeParam::SidebarWidth => &mut self.sidebar_width,
            SizeParam::SidebarCollapsedWidth => &mut self.sidebar_collapsed_width,
            SizeParam::SidebarHeaderHeight => &mut self.sidebar_header_height,
            SizeParam::SidebarFooterHeight => &mut self.sidebar_footer_height,
            SizeParam::InfobarWidth => &mut self.infobar_width,
            SizeParam::InfobarCollapsedWidth => &mut self.infobar_collapsed_width,
            SizeParam::TransitionDuration => &mut self.transition_duration,
        }
    }

    /// Replace one value. Returns whether it changed; empty values are rejected.
    pub fn set(&mut self, param: SizeParam, value: impl Into<String>) -> Result<bool> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(LayoutError::EmptySize(param.key().to_string()));
        }
        let slot = self.slot_mut(param);
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        Ok(true)
    }
}

/// One value per top-level region.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PerRegion<T> {
    pub sidebar: T,
    pub header: T,
    pub body: T,
    pub infobar: T,
    pub footer: T,
}

impl<T> PerRegion<T> {
    pub fn get(&self, region: Region) -> &T {
        match region {
            Region::Sidebar => &self.sidebar,
            Region::Header => &self.header,
            Region::Body => &self.body,
            Region::Infobar => &self.infobar,
            Region::Footer => &self.footer,
        }
    }

    pub fn get_mut(&mut self, region: Region) -> &mut T {
        match region {
            Region::Sidebar => &mut self.sidebar,
            Region::Header => &mut self.header,
            Region::Body => &mut self.body,
            Region::Infobar => &mut self.infobar,
            Region::Footer => &mut self.footer,
        }
    }
}

/// Output of the normalizer and the single source of initial engine state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedConfig {
    pub modes: ModeSet,
    pub sizes: SizeParams,
    pub slots: PerRegion<Option<SlotContent>>,
    pub class_names: PerRegion<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_constants() {
        let sizes = SizeParams::default();
        for param in SizeParam::ALL {
            assert_eq!(sizes.get(param), param.default_value());
            assert_eq!(SizeParam::parse(param.key()).unwrap(), param);
        }
        assert_eq!(sizes.sidebar_width, "15.625rem");
        assert_eq!(sizes.sidebar_collapsed_width, "3.125rem");
    }

    #[test]
    fn set_rejects_empty_values() {
        let mut sizes = SizeParams::default();
        let err = sizes.set(SizeParam::HeaderHeight, "  ").unwrap_err();
        assert_eq!(err, LayoutError::EmptySize("headerHeight".into()));
        assert_eq!(sizes.header_height, DEFAULT_HEADER_HEIGHT);

        assert!(sizes.set(SizeParam::HeaderHeight, "4rem").unwrap());
        assert!(!sizes.set(SizeParam::HeaderHeight, "4rem").unwrap());
    }

    #[test]
    fn unknown_param_key_is_rejected() {
        assert!(matches!(
            SizeParam::parse("gutterWidth"),
            Err(LayoutError::UnknownSizeParam(_))
        ));
    }
}
