use crate::error::{LayoutError, Result};

use super::core::{ModeField, ModeSet, ModeValue, RegionMode};

/// A committed change of one mode field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub field: ModeField,
    pub from: &'static str,
    pub to: &'static str,
}

/// Holds the current mode values of one layout instance.
///
/// Every mutation validates before it commits, so a rejected call leaves the
/// store untouched.
#[derive(Debug, Clone, Default)]
pub struct ModeStore {
    modes: ModeSet,
}

impl ModeStore {
    pub fn new(initial: ModeSet) -> Self {
        Self { modes: initial }
    }

    pub fn modes(&self) -> ModeSet {
        self.modes
    }

    pub fn get(&self, field: ModeField) -> ModeValue {
        self.modes.get(field)
    }

    /// Replace one field. Returns `None` when the value is already current.
    pub fn set(&mut self, value: ModeValue) -> Option<ModeChange> {
        let field = value.field();
        let from = self.modes.token(field);
        if from == value.token() {
            return None;
        }
        self.modes.apply(value);
        Some(ModeChange {
            field,
            from,
            to: value.token(),
        })
    }

    pub fn set_token(&mut self, field: ModeField, token: &str) -> Result<Option<ModeChange>> {
        let value = ModeValue::parse(field, token)?;
        Ok(self.set(value))
    }

    /// Set a mode by string name. Accepts canonical field names and the
    /// three-state region names (`sidebar` = `base|hidden|collapsed`, ...).
    pub fn set_by_name(&mut self, name: &str, token: &str) -> Result<Vec<ModeChange>> {
        let values = match ModeField::parse(name) {
            Some(field) => vec![ModeValue::parse(field, token)?],
            None => RegionMode::parse(name, token)?
                .ok_or_else(|| LayoutError::UnknownModeField(name.to_string()))?
                .values(),
        };
        Ok(values
            .into_iter()
            .filter_map(|value| self.set(value))
            .collect())
    }

    /// Flip a field to the other token of its enumeration.
    pub fn toggle(&mut self, field: ModeField) -> ModeChange {
        let flipped = self.modes.get(field).flipped();
        let from = self.modes.token(field);
        self.modes.apply(flipped);
        ModeChange {
            field,
            from,
            to: flipped.token(),
        }
    }

    pub fn is_theme_dark(&self) -> bool {
        self.modes.is_theme_dark()
    }

    pub fn is_header_hidden(&self) -> bool {
        self.modes.is_header_hidden()
    }

    pub fn is_footer_hidden(&self) -> bool {
        self.modes.is_footer_hidden()
    }

    pub fn is_sidebar_hidden(&self) -> bool {
        self.modes.is_sidebar_hidden()
    }

    pub fn is_sidebar_collapsed(&self) -> bool {
        self.modes.is_sidebar_collapsed()
    }

    pub fn is_infobar_hidden(&self) -> bool {
        self.modes.is_infobar_hidden()
    }

    pub fn is_infobar_collapsed(&self) -> bool {
        self.modes.is_infobar_collapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::{Collapse, ThemeMode, Visibility};

    #[test]
    fn toggle_twice_restores_every_field() {
        for field in ModeField::ALL {
            for token in field.tokens() {
                let mut store = ModeStore::default();
                store.set_token(field, token).unwrap();
                let before = store.modes();

                let first = store.toggle(field);
                assert_eq!(first.from, *token);
                assert_ne!(store.modes(), before);

                store.toggle(field);
                assert_eq!(store.modes(), before);
            }
        }
    }

    #[test]
    fn invalid_token_leaves_store_unchanged() {
        let mut store = ModeStore::default();
        store.set(ModeValue::Theme(ThemeMode::Dark));
        let before = store.modes();

        let err = store.set_token(ModeField::Theme, "sepia").unwrap_err();
        assert!(matches!(err, LayoutError::InvalidMode { .. }));
        assert_eq!(store.modes(), before);
    }

    #[test]
    fn setting_current_value_is_not_a_change() {
        let mut store = ModeStore::default();
        assert!(store.set(ModeValue::HeaderVisible(Visibility::Visible)).is_none());
        let change = store
            .set(ModeValue::HeaderVisible(Visibility::Hidden))
            .unwrap();
        assert_eq!(change.from, "visible");
        assert_eq!(change.to, "hidden");
        assert!(store.is_header_hidden());
    }

    #[test]
    fn set_by_name_accepts_region_tokens() {
        let mut store = ModeStore::default();
        let changes = store.set_by_name("sidebar", "collapsed").unwrap();
        assert_eq!(changes.len(), 1);
        assert!(store.is_sidebar_collapsed());
        assert!(!store.is_sidebar_hidden());

        store.set_by_name("sidebar", "hidden").unwrap();
        assert!(store.is_sidebar_hidden());
        assert_eq!(
            store.get(ModeField::SidebarCollapsed),
            ModeValue::SidebarCollapsed(Collapse::Collapsed)
        );

        store.set_by_name("sidebar", "base").unwrap();
        assert!(!store.is_sidebar_hidden());
        assert!(!store.is_sidebar_collapsed());
    }

    #[test]
    fn set_by_name_rejects_unknown_fields_and_tokens() {
        let mut store = ModeStore::default();
        assert!(matches!(
            store.set_by_name("toolbar", "hidden"),
            Err(LayoutError::UnknownModeField(_))
        ));
        assert!(matches!(
            store.set_by_name("footer", "collapsed"),
            Err(LayoutError::InvalidMode { .. })
        ));
        assert_eq!(store.modes(), ModeSet::default());
    }
}
