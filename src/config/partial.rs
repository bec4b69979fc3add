use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{LayoutError, Result};
use crate::modes::{ModeField, RegionMode};
use crate::registry::{Region, SlotKey};

use super::core::SizeParam;

/// How the untyped reader treats sections and fields of the wrong shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionPolicy {
    /// Treat malformed sections and fields as absent and record their paths.
    #[default]
    Permissive,
    /// Reject malformed sections, fields and unknown keys.
    Strict,
}

/// Raw mode tokens in either schema. Validation happens in `normalize`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialModes {
    pub theme: Option<String>,
    pub header: Option<String>,
    pub header_visible: Option<String>,
    pub footer: Option<String>,
    pub footer_visible: Option<String>,
    pub sidebar: Option<String>,
    pub sidebar_visible: Option<String>,
    pub sidebar_collapsed: Option<String>,
    pub infobar: Option<String>,
    pub infobar_visible: Option<String>,
    pub infobar_collapsed: Option<String>,
}

impl PartialModes {
    pub fn field(&self, field: ModeField) -> Option<&str> {
        match field {
            ModeField::Theme => self.theme.as_deref(),
            ModeField::HeaderVisible => self.header_visible.as_deref(),
            ModeField::FooterVisible => self.footer_visible.as_deref(),
            ModeField::SidebarVisible => self.sidebar_visible.as_deref(),
            ModeField::SidebarCollapsed => self.sidebar_collapsed.as_deref(),
            ModeField::InfobarVisible => self.infobar_visible.as_deref(),
            ModeField::InfobarCollapsed => self.infobar_collapsed.as_deref(),
        }
    }

    fn field_mut(&mut self, field: ModeField) -> &mut Option<String> {
        match field {
            ModeField::Theme => &mut self.theme,
            ModeField::HeaderVisible => &mut self.header_visible,
            ModeField::FooterVisible => &mut self.footer_visible,
            ModeField::SidebarVisible => &mut self.sidebar_visible,
            ModeField::SidebarCollapsed => &mut self.sidebar_collapsed,
            ModeField::InfobarVisible => &mut self.infobar_visible,
            ModeField::InfobarCollapsed => &mut self.infobar_collapsed,
        }
    }

    /// Three-state token for `header`, `footer`, `sidebar` or `infobar`.
    pub fn region(&self, name: &str) -> Option<&str> {
        match name {
            "header" => self.header.as_deref(),
            "footer" => self.footer.as_deref(),
            "sidebar" => self.sidebar.as_deref(),
            "infobar" => self.infobar.as_deref(),
            _ => None,
        }
    }

    fn region_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "header" => Some(&mut self.header),
            "footer" => Some(&mut self.footer),
            "sidebar" => Some(&mut self.sidebar),
            "infobar" => Some(&mut self.infobar),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSizes {
    pub header_height: Option<String>,
    pub footer_height: Option<String>,
    pub sidebar_width: Option<String>,
    pub sidebar_collapsed_width: Option<String>,
    pub sidebar_header_height: Option<String>,
    pub sidebar_footer_height: Option<String>,
    pub infobar_width: Option<String>,
    pub infobar_collapsed_width: Option<String>,
    pub transition_duration: Option<String>,
}

impl PartialSizes {
    pub fn get(&self, param: SizeParam) -> Option<&str> {
        match param {
            SizeParam::HeaderHeight => self.header_height.as_deref(),
            SizeParam::FooterHeight => self.footer_height.as_deref(),
            SizeParam::SidebarWidth => self.sidebar_width.as_deref(),
            SizeParam::SidebarCollapsedWidth => self.sidebar_collapsed_width.as_deref(),
            SizeParam::SidebarHeaderHeight => self.sidebar_header_height.as_deref(),
            SizeParam::SidebarFooterHeight => self.sidebar_footer_height.as_deref(),
            SizeParam::InfobarWidth => self.infobar_width.as_deref(),
            SizeParam::InfobarCollapsedWidth => self.infobar_collapsed_width.as_deref(),
            SizeParam::TransitionDuration => self.transition_duration.as_deref(),
        }
    }

    fn get_mut(&mut self, param: SizeParam) -> &mut Option<String> {
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
}

/// Per-region optional strings (slot content or class names).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartialRegions {
    pub sidebar: Option<String>,
    pub header: Option<String>,
    #[serde(alias = "content")]
    pub body: Option<String>,
    pub infobar: Option<String>,
    pub footer: Option<String>,
}

impl PartialRegions {
    pub fn get(&self, region: Region) -> Option<&str> {
        match region {
            Region::Sidebar => self.sidebar.as_deref(),
            Region::Header => self.header.as_deref(),
            Region::Body => self.body.as_deref(),
            Region::Infobar => self.infobar.as_deref(),
            Region::Footer => self.footer.as_deref(),
        }
    }

    fn get_mut(&mut self, region: Region) -> &mut Option<String> {
        match region {
            Region::Sidebar => &mut self.sidebar,
            Region::Header => &mut self.header,
            Region::Body => &mut self.body,
            Region::Infobar => &mut self.infobar,
            Region::Footer => &mut self.footer,
        }
    }
}

/// Caller-supplied configuration; any part may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialConfig {
    pub modes: PartialModes,
    pub sizes: PartialSizes,
    /// Older name of `sizes`. `sizes` wins per field when both are set.
    pub params: PartialSizes,
    pub slots: PartialRegions,
    pub class_names: PartialRegions,
    /// Paths the permissive reader dropped because of their shape.
    #[serde(skip)]
    pub ignored: Vec<String>,
}

const ROOT: &str = "<root>";
const SECTIONS: [&str; 5] = ["modes", "sizes", "params", "slots", "classNames"];

impl PartialConfig {
    /// Read an untyped configuration value.
    pub fn from_value(value: &Value, policy: SectionPolicy) -> Result<Self> {
        let mut reader = Reader {
            policy,
            ignored: Vec::new(),
        };
        let mut config = PartialConfig::default();

        let root = match value {
            Value::Null => return Ok(config),
            Value::Object(map) => map,
            other => {
                reader.reject_section(ROOT, other)?;
                config.ignored = reader.ignored;
                return Ok(config);
            }
        };
        reader.unknown_keys(ROOT, root, &SECTIONS)?;

        if let Some(modes) = reader.section(root, "modes")? {
            let mut known: Vec<&str> = ModeField::ALL.iter().map(|f| f.name()).collect();
            known.extend(RegionMode::NAMES);
            reader.unknown_keys("modes", modes, &known)?;
            for field in ModeField::ALL {
                *config.modes.field_mut(field) = reader.string("modes", modes, field.name())?;
            }
            for name in RegionMode::NAMES {
                let token = reader.string("modes", modes, name)?;
                if let Some(slot) = config.modes.region_mut(name) {
                    *slot = token;
                }
            }
        }

        for (section, target) in [("sizes", &mut config.sizes), ("params", &mut config.params)] {
            if let Some(map) = reader.section(root, section)? {
                let known: Vec<&str> = SizeParam::ALL.iter().map(|p| p.key()).collect();
                reader.unknown_keys(section, map, &known)?;
                for param in SizeParam::ALL {
                    *target.get_mut(param) = reader.length(section, map, param.key())?;
                }
            }
        }

        for (section, target) in [
            ("slots", &mut config.slots),
            ("classNames", &mut config.class_names),
        ] {
            if let Some(map) = reader.section(root, section)? {
                let mut known: Vec<&str> = Region::all().iter().map(|r| r.name()).collect();
                known.push("content");
                reader.unknown_keys(section, map, &known)?;
                for region in Region::all() {
                    let mut value = reader.string(section, map, region.name())?;
                    if *region == Region::Body && value.is_none() {
                        value = reader.string(section, map, "content")?;
                    }
                    *target.get_mut(*region) = value;
                }
            }
        }

        config.ignored = reader.ignored;
        Ok(config)
    }
}

struct Reader {
    policy: SectionPolicy,
    ignored: Vec<String>,
}

impl Reader {
    fn section<'v>(
        &mut self,
        root: &'v Map<String, Value>,
        name: &str,
    ) -> Result<Option<&'v Map<String, Value>>> {
        match root.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => {
                self.reject_section(name, other)?;
                Ok(None)
            }
        }
    }

    fn string(
        &mut self,
        section: &str,
        map: &Map<String, Value>,
        key: &str,
    ) -> Result<Option<String>> {
        match map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(other) => {
                self.reject_field(section, key, describe(other))?;
                Ok(None)
            }
        }
    }

    /// A length token must be a non-empty string.
    fn length(
        &mut self,
        section: &str,
        map: &Map<String, Value>,
        key: &str,
    ) -> Result<Option<String>> {
        match self.string(section, map, key)? {
            Some(value) if value.trim().is_empty() => {
                self.reject_field(section, key, "an empty string")?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn unknown_keys(
        &mut self,
        section: &str,
        map: &Map<String, Value>,
        known: &[&str],
    ) -> Result<()> {
        for key in map.keys() {
            if !known.contains(&key.as_str()) {
                self.reject_field(section, key, "an unknown key")?;
            }
        }
        Ok(())
    }

    fn reject_section(&mut self, section: &str, found: &Value) -> Result<()> {
        match self.policy {
            SectionPolicy::Strict => Err(LayoutError::MalformedSection {
                section: section.to_string(),
                found: describe(found).to_string(),
            }),
            SectionPolicy::Permissive => {
                self.ignored.push(section.to_string());
                Ok(())
            }
        }
    }

    fn reject_field(&mut self, section: &str, field: &str, found: &str) -> Result<()> {
        match self.policy {
            SectionPolicy::Strict => Err(LayoutError::MalformedField {
                section: section.to_string(),
                field: field.to_string(),
                found: found.to_string(),
            }),
            SectionPolicy::Permissive => {
                self.ignored.push(format!("{section}.{field}"));
                Ok(())
            }
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_and_empty_are_blank_configs() {
        for value in [Value::Null, json!({})] {
            let config = PartialConfig::from_value(&value, SectionPolicy::Strict).unwrap();
            assert_eq!(config, PartialConfig::default());
        }
    }

    #[test]
    fn permissive_drops_malformed_sections() {
        let value = json!({
            "modes": "dark",
            "sizes": { "headerHeight": 48, "footerHeight": "2rem" },
            "slots": [1, 2],
        });
        let config = PartialConfig::from_value(&value, SectionPolicy::Permissive).unwrap();
        assert_eq!(config.modes, PartialModes::default());
        assert_eq!(config.sizes.header_height, None);
        assert_eq!(config.sizes.footer_height.as_deref(), Some("2rem"));
        assert_eq!(config.ignored, vec!["modes", "sizes.headerHeight", "slots"]);
    }

    #[test]
    fn wrong_typed_mode_field_falls_back_to_default() {
        let value = json!({ "modes": { "theme": 5, "sidebar": "collapsed" } });
        let config = PartialConfig::from_value(&value, SectionPolicy::Permissive).unwrap();
        assert_eq!(config.modes.theme, None);
        assert_eq!(config.ignored, vec!["modes.theme"]);

        let normalized = crate::config::normalize(&config).unwrap();
        assert_eq!(normalized.modes.theme, crate::modes::ThemeMode::Light);
        assert!(normalized.modes.is_sidebar_collapsed());

        let err = PartialConfig::from_value(&value, SectionPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            LayoutError::MalformedField {
                section: "modes".into(),
                field: "theme".into(),
                found: "a number".into(),
            }
        );
    }

    #[test]
    fn strict_rejects_malformed_sections() {
        let err = PartialConfig::from_value(&json!({ "modes": 3 }), SectionPolicy::Strict)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::MalformedSection {
                section: "modes".into(),
                found: "a number".into(),
            }
        );

        let err = PartialConfig::from_value(
            &json!({ "sizes": { "sidebarWidth": "" } }),
            SectionPolicy::Strict,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::MalformedField { ref field, .. } if field == "sidebarWidth"
        ));
    }

    #[test]
    fn non_object_root_is_a_malformed_section() {
        let permissive =
            PartialConfig::from_value(&json!(true), SectionPolicy::Permissive).unwrap();
        assert_eq!(permissive.ignored, vec![ROOT]);
        assert!(PartialConfig::from_value(&json!("x"), SectionPolicy::Strict).is_err());
    }

    #[test]
    fn reads_both_mode_schemas_and_content_alias() {
        let value = json!({
            "modes": { "theme": "dark", "sidebar": "collapsed", "infobarVisible": "hidden" },
            "slots": { "content": "page", "footer": "status" },
            "classNames": { "body": "main" },
        });
        let config = PartialConfig::from_value(&value, SectionPolicy::Strict).unwrap();
        assert_eq!(config.modes.theme.as_deref(), Some("dark"));
        assert_eq!(config.modes.region("sidebar"), Some("collapsed"));
        assert_eq!(config.modes.field(ModeField::InfobarVisible), Some("hidden"));
        assert_eq!(config.slots.get(Region::Body), Some("page"));
        assert_eq!(config.class_names.get(Region::Body), Some("main"));
        assert!(config.ignored.is_empty());
    }

    #[test]
    fn unknown_keys_follow_the_policy() {
        let value = json!({ "modes": { "toolbar": "hidden" }, "extras": {} });
        let config = PartialConfig::from_value(&value, SectionPolicy::Permissive).unwrap();
        assert_eq!(config.ignored, vec!["<root>.extras", "modes.toolbar"]);
        assert!(PartialConfig::from_value(&value, SectionPolicy::Strict).is_err());
    }

    #[test]
    fn typed_deserialization_accepts_the_same_shape() {
        let config: PartialConfig = serde_json::from_value(json!({
            "modes": { "headerVisible": "hidden" },
            "params": { "transitionDuration": "0.3s" },
        }))
        .unwrap();
        assert_eq!(config.modes.header_visible.as_deref(), Some("hidden"));
        assert_eq!(config.params.transition_duration.as_deref(), Some("0.3s"));
    }
}
