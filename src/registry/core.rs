use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash as StdHash;

use blake3::Hash;
use serde::Serialize;

/// Opaque content handle stored for a populated slot.
pub type SlotContent = String;

/// Key type of a slot registry.
pub trait SlotKey: Copy + Eq + StdHash + fmt::Debug + Send + Sync + 'static {
    fn name(self) -> &'static str;

    fn all() -> &'static [Self];

    fn parse(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|key| key.name() == name)
    }
}

/// Top-level layout regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Sidebar,
    Header,
    Body,
    Infobar,
    Footer,
}

impl SlotKey for Region {
    fn name(self) -> &'static str {
        match self {
            Self::Sidebar => "sidebar",
            Self::Header => "header",
            Self::Body => "body",
            Self::Infobar => "infobar",
            Self::Footer => "footer",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Sidebar,
            Self::Header,
            Self::Body,
            Self::Infobar,
            Self::Footer,
        ]
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "content" => Some(Self::Body),
            _ => Self::all().iter().copied().find(|key| key.name() == name),
        }
    }
}

/// Sub-slots of the sidebar region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarSlot {
    Header,
    Body,
    Footer,
}

impl SlotKey for SidebarSlot {
    fn name(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Body => "body",
            Self::Footer => "footer",
        }
    }

    fn all() -> &'static [Self] {
        &[Self::Header, Self::Body, Self::Footer]
    }
}

/// Proof of one registration. Releasing with a stale lease is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotLease(u64);

#[derive(Debug, Clone)]
pub struct SlotEntry {
    pub content: SlotContent,
    hash: Hash,
    lease: SlotLease,
}

impl SlotEntry {
    pub fn lease(&self) -> SlotLease {
        self.lease
    }
}

/// Outcome of [`SlotRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRegistration {
    pub lease: SlotLease,
    /// True when the slot was empty or held different content.
    pub content_changed: bool,
    pub class_changed: bool,
}

impl SlotRegistration {
    /// False when the same content and class were already registered.
    pub fn changed(&self) -> bool {
        self.content_changed || self.class_changed
    }
}

/// Tracks which slots are populated and the class name attached to each.
#[derive(Debug)]
pub struct SlotRegistry<K: SlotKey> {
    entries: HashMap<K, SlotEntry>,
    class_names: HashMap<K, String>,
    next_lease: u64,
}

impl<K: SlotKey> Default for SlotRegistry<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            class_names: HashMap::new(),
            next_lease: 1,
        }
    }
}

impl<K: SlotKey> SlotRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as populated. Re-registering replaces the previous payload.
    pub fn register(
        &mut self,
        key: K,
        content: impl Into<SlotContent>,
        class_name: impl Into<String>,
    ) -> SlotRegistration {
        let content = content.into();
        let hash = blake3::hash(content.as_bytes());
        let lease = self.issue_lease();

        let class_changed = self.set_class_name(key, class_name);
        let content_changed = self
            .entries
            .get(&key)
            .map(|entry| entry.hash != hash)
            .unwrap_or(true);

        self.entries.insert(
            key,
            SlotEntry {
                content,
                hash,
                lease,
            },
        );

        SlotRegistration {
            lease,
            content_changed,
            class_changed,
        }
    }

    /// Clear presence and class name. Returns whether anything was cleared.
    pub fn unregister(&mut self, key: K) -> bool {
        let removed = self.entries.remove(&key).is_some();
        let class_cleared = self.class_names.remove(&key).is_some();
        removed || class_cleared
    }

    /// Clear `key` only if `lease` is still the current registration.
    pub fn release(&mut self, key: K, lease: SlotLease) -> bool {
        if self.lease_of(key) != Some(lease) {
            return false;
        }
        self.unregister(key)
    }

    /// Returns whether the stored class name changed.
    pub fn set_class_name(&mut self, key: K, class_name: impl Into<String>) -> bool {
        let class_name = class_name.into();
        if class_name.is_empty() {
            return self.class_names.remove(&key).is_some();
        }
        if self.class_names.get(&key) == Some(&class_name) {
            return false;
        }
        self.class_names.insert(key, class_name);
        true
    }

    pub fn is_present(&self, key: K) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn content(&self, key: K) -> Option<&str> {
        self.entries.get(&key).map(|entry| entry.content.as_str())
    }

    pub fn class_name(&self, key: K) -> &str {
        self.class_names.get(&key).map(String::as_str).unwrap_or("")
    }

    pub fn lease_of(&self, key: K) -> Option<SlotLease> {
        self.entries.get(&key).map(SlotEntry::lease)
    }

    /// Populated keys in declaration order.
    pub fn populated(&self) -> impl Iterator<Item = K> + '_ {
        K::all().iter().copied().filter(|key| self.is_present(*key))
    }

    pub fn has_any(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Every key mapped to its class name (empty when unset).
    pub fn class_name_map(&self) -> BTreeMap<String, String> {
        K::all()
            .iter()
            .map(|key| (key.name().to_string(), self.class_name(*key).to_string()))
            .collect()
    }

    fn issue_lease(&mut self) -> SlotLease {
        let lease = SlotLease(self.next_lease);
        self.next_lease = self.next_lease.wrapping_add(1);
        lease
    }
}

/// Presence flags of the top-level regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SlotPresence {
    pub sidebar: bool,
    pub header: bool,
    pub body: bool,
    pub infobar: bool,
    pub footer: bool,
}

impl SlotPresence {
    pub fn get(&self, region: Region) -> bool {
        match region {
            Region::Sidebar => self.sidebar,
            Region::Header => self.header,
            Region::Body => self.body,
            Region::Infobar => self.infobar,
            Region::Footer => self.footer,
        }
    }

    pub fn set(&mut self, region: Region, present: bool) {
        match region {
            Region::Sidebar => self.sidebar = present,
            Region::Header => self.header = present,
            Region::Body => self.body = present,
            Region::Infobar => self.infobar = present,
            Region::Footer => self.footer = present,
        }
    }

    /// Every region populated.
    pub fn all() -> Self {
        Self {
            sidebar: true,
            header: true,
            body: true,
            infobar: true,
            footer: true,
        }
    }
}

/// Presence flags of the sidebar sub-slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SidebarPresence {
    pub header: bool,
    pub body: bool,
    pub footer: bool,
}

impl SidebarPresence {
    pub fn any(&self) -> bool {
        self.header || self.body || self.footer
    }
}

impl SlotRegistry<Region> {
    pub fn presence(&self) -> SlotPresence {
        let mut presence = SlotPresence::default();
        for region in self.populated() {
            presence.set(region, true);
        }
        presence
    }
}

impl SlotRegistry<SidebarSlot> {
    pub fn presence(&self) -> SidebarPresence {
        SidebarPresence {
            header: self.is_present(SidebarSlot::Header),
            body: self.is_present(SidebarSlot::Body),
            footer: self.is_present(SidebarSlot::Footer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_registration_replaces_the_first() {
        let mut registry = SlotRegistry::new();
        registry.register(Region::Header, "logo", "bar");
        registry.register(Region::Header, "title", "bar--wide");

        assert!(registry.is_present(Region::Header));
        assert_eq!(registry.content(Region::Header), Some("title"));
        assert_eq!(registry.class_name(Region::Header), "bar--wide");
        assert_eq!(registry.populated().count(), 1);

        assert!(registry.unregister(Region::Header));
        assert!(!registry.is_present(Region::Header));
        assert_eq!(registry.class_name(Region::Header), "");
    }

    #[test]
    fn identical_payload_is_not_a_change() {
        let mut registry = SlotRegistry::new();
        let first = registry.register(Region::Footer, "status", "");
        assert!(first.changed());

        let second = registry.register(Region::Footer, "status", "");
        assert!(!second.changed());
        assert_ne!(first.lease, second.lease);

        let third = registry.register(Region::Footer, "status", "dim");
        assert!(third.changed());
        assert!(!third.content_changed);
    }

    #[test]
    fn unregister_unknown_slot_is_noop() {
        let mut registry: SlotRegistry<Region> = SlotRegistry::new();
        assert!(!registry.unregister(Region::Infobar));
        assert!(!registry.has_any());
    }

    #[test]
    fn stale_lease_cannot_clear_newer_registration() {
        let mut registry = SlotRegistry::new();
        let old = registry.register(SidebarSlot::Footer, "v1", "").lease;
        let new = registry.register(SidebarSlot::Footer, "v2", "").lease;

        assert!(!registry.release(SidebarSlot::Footer, old));
        assert_eq!(registry.content(SidebarSlot::Footer), Some("v2"));

        assert!(registry.release(SidebarSlot::Footer, new));
        assert!(!registry.presence().any());
    }

    #[test]
    fn class_name_is_independent_of_presence() {
        let mut registry = SlotRegistry::new();
        assert!(registry.set_class_name(Region::Body, "main"));
        assert!(!registry.set_class_name(Region::Body, "main"));
        assert!(!registry.is_present(Region::Body));
        assert_eq!(registry.class_name_map()["body"], "main");
        assert_eq!(registry.class_name_map()["footer"], "");
    }

    #[test]
    fn content_alias_resolves_to_body() {
        assert_eq!(Region::parse("content"), Some(Region::Body));
        assert_eq!(Region::parse("body"), Some(Region::Body));
        assert_eq!(Region::parse("toolbar"), None);
        assert_eq!(SidebarSlot::parse("footer"), Some(SidebarSlot::Footer));
    }

    #[test]
    fn presence_snapshot_tracks_registrations() {
        let mut registry = SlotRegistry::new();
        registry.register(Region::Body, "page", "");
        registry.register(Region::Infobar, "details", "");
        let presence = registry.presence();
        assert!(presence.body && presence.infobar);
        assert!(!presence.header && !presence.footer && !presence.sidebar);
    }
}
