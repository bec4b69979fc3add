use std::collections::{BTreeMap, VecDeque};
use std::ops::Deref;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, RwLock, Weak};
use std::thread::{self, ThreadId};
use std::time::Instant;

use serde::Serialize;
use serde_json::{Value, json};

use crate::config::{
    NormalizedConfig, PartialConfig, SectionPolicy, SizeParam, SizeParams, normalize,
};
use crate::error::{LayoutError, Result};
use crate::geometry::{
    AttributeMap, CssVariables, Geometry, SidebarGeometry, attribute_map, compute_geometry,
    compute_sidebar_geometry,
};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{EngineMetrics, MetricSnapshot};
use crate::modes::{ModeChange, ModeField, ModeSet, ModeStore, ModeValue};
use crate::registry::{
    Region, SidebarPresence, SlotContent, SlotKey, SlotLease, SlotPresence, SlotRegistry,
    region_classes,
};

use super::audit::{LayoutEvent, LayoutObserver, ObserverId, SlotRef};
use super::guard::SlotGuard;
use super::sidebar::{SidebarScope, SidebarState};

pub(crate) const LOG_TARGET: &str = "shellframe::engine";
const METRICS_TARGET: &str = "shellframe::engine.metrics";

/// Options for constructing a [`Layout`].
#[derive(Clone, Default)]
pub struct EngineOptions {
    /// Optional structured logger used by the engine.
    pub logger: Option<Logger>,
    /// Counters shared with the caller.
    pub metrics: Option<Arc<Mutex<EngineMetrics>>>,
    /// How malformed configuration sections are treated.
    pub section_policy: SectionPolicy,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_section_policy(mut self, policy: SectionPolicy) -> Self {
        self.section_policy = policy;
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(EngineMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<EngineMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Committed state of one layout instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    pub modes: ModeSet,
    pub sizes: SizeParams,
    pub presence: SlotPresence,
    /// Sub-slot presence while a sidebar scope is open.
    pub sidebar: Option<SidebarPresence>,
    pub class_names: BTreeMap<String, String>,
    pub geometry: Geometry,
}

impl LayoutSnapshot {
    /// Populated and not hidden by its mode.
    pub fn shows(&self, region: Region) -> bool {
        region_shown(&self.modes, &self.presence, region)
    }

    pub fn has_header(&self) -> bool {
        self.shows(Region::Header)
    }

    pub fn has_footer(&self) -> bool {
        self.shows(Region::Footer)
    }

    pub fn has_sidebar(&self) -> bool {
        self.shows(Region::Sidebar)
    }

    pub fn has_infobar(&self) -> bool {
        self.shows(Region::Infobar)
    }

    pub fn has_content(&self) -> bool {
        self.presence.body
    }
}

/// Everything a presentation layer needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutFrame {
    pub geometry: Geometry,
    /// Top-level variables, plus the sidebar ones while a sidebar scope is open.
    pub css_variables: CssVariables,
    pub attributes: AttributeMap,
    /// Region name to composed presentation classes.
    pub classes: BTreeMap<String, String>,
    pub sidebar: Option<SidebarGeometry>,
}

fn region_shown(modes: &ModeSet, presence: &SlotPresence, region: Region) -> bool {
    let hidden = match region {
        Region::Header => modes.is_header_hidden(),
        Region::Footer => modes.is_footer_hidden(),
        Region::Sidebar => modes.is_sidebar_hidden(),
        Region::Infobar => modes.is_infobar_hidden(),
        Region::Body => false,
    };
    presence.get(region) && !hidden
}

#[derive(Debug)]
pub(crate) struct EngineState {
    pub(crate) modes: ModeStore,
    pub(crate) sizes: SizeParams,
    pub(crate) slots: SlotRegistry<Region>,
    pub(crate) sidebar: Option<SidebarState>,
    next_scope: u64,
}

impl EngineState {
    fn from_config(config: NormalizedConfig) -> Self {
        let NormalizedConfig {
            modes,
            sizes,
            mut slots,
            mut class_names,
        } = config;

        let mut registry = SlotRegistry::new();
        for region in Region::all().iter().copied() {
            let class_name = std::mem::take(class_names.get_mut(region));
            match slots.get_mut(region).take() {
                Some(content) => {
                    registry.register(region, content, class_name);
                }
                None => {
                    registry.set_class_name(region, class_name);
                }
            }
        }

        Self {
            modes: ModeStore::new(modes),
            sizes,
            slots: registry,
            sidebar: None,
            next_scope: 0,
        }
    }

    /// Top-level presence. The sidebar also counts as populated while the
    /// open sidebar scope has any sub-slot registered.
    pub(crate) fn presence(&self) -> SlotPresence {
        let mut presence = self.slots.presence();
        if self
            .sidebar_presence()
            .is_some_and(|sidebar| sidebar.any())
        {
            presence.sidebar = true;
        }
        presence
    }

    pub(crate) fn sidebar_presence(&self) -> Option<SidebarPresence> {
        self.sidebar.as_ref().map(|sidebar| sidebar.slots.presence())
    }

    fn shows(&self, region: Region) -> bool {
        region_shown(&self.modes.modes(), &self.presence(), region)
    }

    fn geometry(&self) -> Geometry {
        compute_geometry(&self.modes.modes(), &self.sizes, &self.presence())
    }

    fn sidebar_geometry(&self) -> Option<SidebarGeometry> {
        self.sidebar_presence()
            .map(|presence| compute_sidebar_geometry(&self.sizes, &presence))
    }

    fn css_variables(&self) -> CssVariables {
        let mut variables = self.geometry().css_variables();
        if let Some(sidebar) = self.sidebar_geometry() {
            variables.extend(sidebar.css_variables());
        }
        variables
    }

    fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            modes: self.modes.modes(),
            sizes: self.sizes.clone(),
            presence: self.presence(),
            sidebar: self.sidebar_presence(),
            class_names: self.slots.class_name_map(),
            geometry: self.geometry(),
        }
    }

    fn frame(&self) -> Result<LayoutFrame> {
        if !self.slots.is_present(Region::Body) {
            return Err(LayoutError::MissingContent);
        }
        let modes = self.modes.modes();
        let geometry = self.geometry();
        let classes = Region::all()
            .iter()
            .map(|region| {
                (
                    region.name().to_string(),
                    region_classes(*region, &modes, self.slots.class_name(*region)),
                )
            })
            .collect();
        Ok(LayoutFrame {
            css_variables: self.css_variables(),
            attributes: geometry.attributes.clone(),
            geometry,
            classes,
            sidebar: self.sidebar_geometry(),
        })
    }

    pub(crate) fn open_scope(&mut self) -> u64 {
        self.next_scope = self.next_scope.wrapping_add(1);
        self.sidebar = Some(SidebarState::new(self.next_scope));
        self.next_scope
    }
}

/// Register into either registry and record what changed.
pub(crate) fn register_into<K: SlotKey>(
    registry: &mut SlotRegistry<K>,
    key: K,
    slot: SlotRef,
    content: SlotContent,
    class_name: String,
    events: &mut Vec<LayoutEvent>,
) -> SlotLease {
    let registration = registry.register(key, content, class_name);
    if registration.content_changed {
        events.push(LayoutEvent::SlotRegistered { slot });
    }
    if registration.class_changed {
        events.push(LayoutEvent::ClassNameChanged {
            slot,
            class_name: registry.class_name(key).to_string(),
        });
    }
    registration.lease
}

pub(crate) fn clear_from<K: SlotKey>(
    registry: &mut SlotRegistry<K>,
    key: K,
    slot: SlotRef,
    events: &mut Vec<LayoutEvent>,
) -> bool {
    let was_present = registry.is_present(key);
    let had_class = !registry.class_name(key).is_empty();
    if !registry.unregister(key) {
        return false;
    }
    if was_present {
        events.push(LayoutEvent::SlotCleared { slot });
    }
    if had_class {
        events.push(LayoutEvent::ClassNameChanged {
            slot,
            class_name: String::new(),
        });
    }
    true
}

pub(crate) fn set_class_in<K: SlotKey>(
    registry: &mut SlotRegistry<K>,
    key: K,
    slot: SlotRef,
    class_name: String,
    events: &mut Vec<LayoutEvent>,
) -> bool {
    if !registry.set_class_name(key, class_name) {
        return false;
    }
    events.push(LayoutEvent::ClassNameChanged {
        slot,
        class_name: registry.class_name(key).to_string(),
    });
    true
}

type ObserverEntry = (ObserverId, Box<dyn LayoutObserver>);

struct Queued {
    seq: u64,
    event: LayoutEvent,
    snapshot: Arc<LayoutSnapshot>,
}

#[derive(Default)]
struct Dispatcher {
    observers: Vec<ObserverEntry>,
    queue: VecDeque<Queued>,
    delivering: bool,
    deliverer: Option<ThreadId>,
    // sequence numbers of the last queued and last fully delivered event
    queued: u64,
    delivered: u64,
    // observers taken out of `observers` for the event in flight
    in_flight: Vec<ObserverId>,
    removed: Vec<ObserverId>,
    next_id: u64,
}

/// Observers taken out of the dispatcher for one event. Dropping the round
/// puts them back; a round dropped without [`finish`](Self::finish) (an
/// observer panicked or the dispatcher lock failed) also ends delivery.
struct DeliveryRound<'a> {
    shared: &'a Shared,
    seq: u64,
    observers: Vec<ObserverEntry>,
    finished: bool,
}

impl DeliveryRound<'_> {
    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for DeliveryRound<'_> {
    fn drop(&mut self) {
        let mut dispatch = match self.shared.dispatch.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let removed = std::mem::take(&mut dispatch.removed);
        let added = std::mem::take(&mut dispatch.observers);
        let mut observers = std::mem::take(&mut self.observers);
        observers.retain(|(id, _)| !removed.contains(id));
        observers.extend(added);
        dispatch.observers = observers;
        dispatch.in_flight.clear();
        if self.finished {
            dispatch.delivered = self.seq;
        } else {
            dispatch.queue.clear();
            dispatch.delivered = dispatch.queued;
            dispatch.delivering = false;
            dispatch.deliverer = None;
        }
        self.shared.settled.notify_all();
    }
}

pub(crate) struct Shared {
    state: RwLock<EngineState>,
    dispatch: Mutex<Dispatcher>,
    // signalled whenever delivery progresses or stops
    settled: Condvar,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<EngineMetrics>>>,
    started: Instant,
}

impl Shared {
    pub(crate) fn read<T>(&self, read: impl FnOnce(&EngineState) -> T) -> Result<T> {
        let state = self.state.read().map_err(|_| LayoutError::Poisoned)?;
        Ok(read(&*state))
    }

    /// Apply one mutation atomically, then deliver its events with no lock
    /// held. A mutation must validate before it touches state.
    pub(crate) fn commit<T, F>(&self, operation: &'static str, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut EngineState, &mut Vec<LayoutEvent>) -> Result<T>,
    {
        let mut events = Vec::new();
        let (outcome, snapshot) = {
            let mut state = self.state.write().map_err(|_| LayoutError::Poisoned)?;
            let outcome = mutate(&mut *state, &mut events);
            let snapshot = (outcome.is_ok() && !events.is_empty())
                .then(|| Arc::new(state.snapshot()));
            (outcome, snapshot)
        };

        match outcome {
            Ok(value) => {
                if let Some(snapshot) = snapshot {
                    self.publish(events, snapshot)?;
                }
                Ok(value)
            }
            Err(err) => {
                self.reject(operation, &err);
                Err(err)
            }
        }
    }

    /// Queue events for delivery. The first caller drains the queue; a
    /// re-entrant caller on the delivering thread returns at once, and a
    /// caller on another thread waits until its events have been delivered.
    fn publish(&self, events: Vec<LayoutEvent>, snapshot: Arc<LayoutSnapshot>) -> Result<()> {
        let mode_changes = events
            .iter()
            .filter(|event| matches!(event, LayoutEvent::ModeChanged { .. }))
            .count();
        self.record(|metrics| metrics.record_mode_changes(mode_changes));
        for event in &events {
            self.emit(LogLevel::Debug, event.name(), event.fields());
        }

        {
            let mut dispatch = self.lock_dispatch()?;
            if dispatch.observers.is_empty() && !dispatch.delivering {
                return Ok(());
            }
            for event in events {
                dispatch.queued += 1;
                let seq = dispatch.queued;
                let snapshot = Arc::clone(&snapshot);
                dispatch.queue.push_back(Queued { seq, event, snapshot });
            }
            let last = dispatch.queued;
            let current = thread::current().id();
            if dispatch.delivering {
                if dispatch.deliverer == Some(current) {
                    return Ok(());
                }
                while dispatch.delivering && dispatch.delivered < last {
                    dispatch = self
                        .settled
                        .wait(dispatch)
                        .map_err(|_| LayoutError::Poisoned)?;
                }
                return Ok(());
            }
            dispatch.delivering = true;
            dispatch.deliverer = Some(current);
        }
        self.drain()
    }

    fn drain(&self) -> Result<()> {
        let mut delivered = 0;
        loop {
            let (event, snapshot, mut round) = {
                let mut dispatch = self.lock_dispatch()?;
                let Some(Queued { seq, event, snapshot }) = dispatch.queue.pop_front() else {
                    dispatch.delivering = false;
                    dispatch.deliverer = None;
                    self.settled.notify_all();
                    break;
                };
                let observers = std::mem::take(&mut dispatch.observers);
                dispatch.in_flight = observers.iter().map(|(id, _)| *id).collect();
                let round = DeliveryRound { shared: self, seq, observers, finished: false };
                (event, snapshot, round)
            };

            for (id, observer) in round.observers.iter_mut() {
                let removed = self.lock_dispatch()?.removed.contains(id);
                if removed {
                    continue;
                }
                observer.on_event(&event, &snapshot);
                delivered += 1;
            }
            round.finish();
        }
        self.record(|metrics| metrics.record_notifications(delivered));
        Ok(())
    }

    fn subscribe(&self, observer: Box<dyn LayoutObserver>) -> Result<ObserverId> {
        let mut dispatch = self.lock_dispatch()?;
        dispatch.next_id += 1;
        let id = ObserverId(dispatch.next_id);
        dispatch.observers.push((id, observer));
        Ok(id)
    }

    fn unsubscribe(&self, id: ObserverId) -> Result<bool> {
        let mut dispatch = self.lock_dispatch()?;
        if let Some(index) = dispatch.observers.iter().position(|(entry, _)| *entry == id) {
            dispatch.observers.remove(index);
            return Ok(true);
        }
        if dispatch.in_flight.contains(&id) && !dispatch.removed.contains(&id) {
            dispatch.removed.push(id);
            return Ok(true);
        }
        Ok(false)
    }

    fn lock_dispatch(&self) -> Result<MutexGuard<'_, Dispatcher>> {
        self.dispatch.lock().map_err(|_| LayoutError::Poisoned)
    }

    fn reject(&self, operation: &'static str, err: &LayoutError) {
        self.record(EngineMetrics::record_rejection);
        let level = match err {
            LayoutError::MissingContent => LogLevel::Error,
            _ => LogLevel::Warn,
        };
        self.emit(
            level,
            "mutation_rejected",
            [
                json_kv("operation", operation),
                json_kv("error", err.to_string()),
            ],
        );
    }

    pub(crate) fn record(&self, update: impl FnOnce(&mut EngineMetrics)) {
        if let Some(metrics) = &self.metrics {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut guard);
            }
        }
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        fields: impl IntoIterator<Item = (String, Value)>,
    ) {
        if let Some(logger) = &self.logger {
            if logger.enabled(level) {
                let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
            }
        }
    }
}

/// One layout instance. Owns its mode store and slot registries.
///
/// Every operation lives on [`LayoutHandle`], which `Layout` derefs to. Hand
/// clones of [`Layout::handle`] to collaborators: they stop working with
/// [`LayoutError::NoActiveLayout`] once the `Layout` is dropped.
pub struct Layout {
    shared: Arc<Shared>,
    handle: LayoutHandle,
}

impl Layout {
    pub fn new(config: NormalizedConfig) -> Self {
        Self::with_options(config, EngineOptions::default())
    }

    pub fn with_options(config: NormalizedConfig, options: EngineOptions) -> Self {
        let EngineOptions {
            logger, metrics, ..
        } = options;
        let shared = Arc::new(Shared {
            state: RwLock::new(EngineState::from_config(config)),
            dispatch: Mutex::new(Dispatcher::default()),
            settled: Condvar::new(),
            logger,
            metrics,
            started: Instant::now(),
        });
        let handle = LayoutHandle {
            shared: Arc::downgrade(&shared),
        };

        if let Ok(state) = shared.state.read() {
            let populated: Vec<&str> = state.slots.populated().map(Region::name).collect();
            shared.emit(
                LogLevel::Info,
                "layout_created",
                [
                    json_kv("theme", state.modes.modes().theme.token()),
                    json_kv("slots", json!(populated)),
                ],
            );
        }

        Self { shared, handle }
    }

    /// Normalize `partial` and build a layout from it. Configuration paths
    /// dropped while reading are logged as warnings.
    pub fn from_partial(partial: &PartialConfig, options: EngineOptions) -> Result<Self> {
        let config = normalize(partial);
        if let (Err(err), Some(logger)) = (&config, &options.logger) {
            let _ = logger.log_event(event_with_fields(
                LogLevel::Error,
                LOG_TARGET,
                "config_rejected",
                [json_kv("error", err.to_string())],
            ));
        }
        let layout = Self::with_options(config?, options);
        for path in &partial.ignored {
            layout
                .shared
                .emit(LogLevel::Warn, "config_ignored", [json_kv("path", path.as_str())]);
        }
        Ok(layout)
    }

    /// Read, normalize and build from an untyped JSON value using the
    /// section policy in `options`.
    pub fn from_value(value: &Value, options: EngineOptions) -> Result<Self> {
        let partial = PartialConfig::from_value(value, options.section_policy)?;
        Self::from_partial(&partial, options)
    }

    pub fn handle(&self) -> LayoutHandle {
        self.handle.clone()
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(NormalizedConfig::default())
    }
}

impl Deref for Layout {
    type Target = LayoutHandle;

    fn deref(&self) -> &LayoutHandle {
        &self.handle
    }
}

impl Drop for Layout {
    fn drop(&mut self) {
        self.shared.emit(LogLevel::Debug, "layout_dropped", std::iter::empty());
    }
}

/// Weak accessor to a [`Layout`].
#[derive(Clone, Debug)]
pub struct LayoutHandle {
    shared: Weak<Shared>,
}

impl LayoutHandle {
    pub(crate) fn shared(&self) -> Result<Arc<Shared>> {
        self.shared.upgrade().ok_or(LayoutError::NoActiveLayout)
    }

    /// Whether the owning layout is still alive.
    pub fn is_active(&self) -> bool {
        self.shared.strong_count() > 0
    }

    fn read<T>(&self, read: impl FnOnce(&EngineState) -> T) -> Result<T> {
        self.shared()?.read(read)
    }

    fn commit<T, F>(&self, operation: &'static str, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut EngineState, &mut Vec<LayoutEvent>) -> Result<T>,
    {
        self.shared()?.commit(operation, mutate)
    }

    // Modes

    /// Returns `None` when the value was already current.
    pub fn set_mode(&self, value: ModeValue) -> Result<Option<ModeChange>> {
        self.commit("set_mode", |state, events| {
            let change = state.modes.set(value);
            events.extend(change.map(LayoutEvent::from));
            Ok(change)
        })
    }

    pub fn set_mode_token(&self, field: ModeField, token: &str) -> Result<Option<ModeChange>> {
        self.commit("set_mode", |state, events| {
            let change = state.modes.set_token(field, token)?;
            events.extend(change.map(LayoutEvent::from));
            Ok(change)
        })
    }

    /// Accepts canonical field names (`sidebarCollapsed`) and the three-state
    /// region names (`sidebar` = `base|hidden|collapsed`).
    pub fn set_mode_by_name(&self, name: &str, token: &str) -> Result<Vec<ModeChange>> {
        self.commit("set_mode", |state, events| {
            let changes = state.modes.set_by_name(name, token)?;
            events.extend(changes.iter().copied().map(LayoutEvent::from));
            Ok(changes)
        })
    }

    pub fn toggle_mode(&self, field: ModeField) -> Result<ModeChange> {
        let shared = self.shared()?;
        let change = shared.commit("toggle_mode", |state, events| {
            let change = state.modes.toggle(field);
            events.push(change.into());
            Ok(change)
        })?;
        shared.record(EngineMetrics::record_toggle);
        Ok(change)
    }

    pub fn toggle_theme_mode(&self) -> Result<ModeChange> {
        self.toggle_mode(ModeField::Theme)
    }

    pub fn toggle_header_visible_mode(&self) -> Result<ModeChange> {
        self.toggle_mode(ModeField::HeaderVisible)
    }

    pub fn toggle_footer_visible_mode(&self) -> Result<ModeChange> {
        self.toggle_mode(ModeField::FooterVisible)
    }

    pub fn toggle_sidebar_visible_mode(&self) -> Result<ModeChange> {
        self.toggle_mode(ModeField::SidebarVisible)
    }

    pub fn toggle_sidebar_collapsed_mode(&self) -> Result<ModeChange> {
        self.toggle_mode(ModeField::SidebarCollapsed)
    }

    pub fn toggle_infobar_visible_mode(&self) -> Result<ModeChange> {
        self.toggle_mode(ModeField::InfobarVisible)
    }

    pub fn toggle_infobar_collapsed_mode(&self) -> Result<ModeChange> {
        self.toggle_mode(ModeField::InfobarCollapsed)
    }

    // Sizes

    /// Returns whether the value changed. Blank values are rejected.
    pub fn set_size(&self, param: SizeParam, value: impl Into<String>) -> Result<bool> {
        let value = value.into();
        let shared = self.shared()?;
        let changed = shared.commit("set_size", |state, events| {
            let from = state.sizes.get(param).to_string();
            let changed = state.sizes.set(param, value.as_str())?;
            if changed {
                events.push(LayoutEvent::SizeChanged {
                    param,
                    from,
                    to: value.clone(),
                });
            }
            Ok(changed)
        })?;
        if changed {
            shared.record(EngineMetrics::record_size_change);
        }
        Ok(changed)
    }

    pub fn set_size_by_name(&self, key: &str, value: impl Into<String>) -> Result<bool> {
        let param = SizeParam::parse(key);
        match param {
            Ok(param) => self.set_size(param, value),
            Err(err) => {
                self.shared()?.reject("set_size", &err);
                Err(err)
            }
        }
    }

    // Slots

    /// Mark `region` populated. A later registration replaces this one.
    pub fn register_slot(
        &self,
        region: Region,
        content: impl Into<SlotContent>,
        class_name: impl Into<String>,
    ) -> Result<SlotLease> {
        let (content, class_name) = (content.into(), class_name.into());
        let shared = self.shared()?;
        let lease = shared.commit("register_slot", |state, events| {
            Ok(register_into(
                &mut state.slots,
                region,
                SlotRef::Layout(region),
                content,
                class_name,
                events,
            ))
        })?;
        shared.record(EngineMetrics::record_registration);
        Ok(lease)
    }

    /// Register by region name (`content` is accepted for `body`).
    pub fn register_slot_by_name(
        &self,
        name: &str,
        content: impl Into<SlotContent>,
        class_name: impl Into<String>,
    ) -> Result<SlotLease> {
        match Region::parse(name) {
            Some(region) => self.register_slot(region, content, class_name),
            None => {
                let err = LayoutError::UnknownSlot(name.to_string());
                self.shared()?.reject("register_slot", &err);
                Err(err)
            }
        }
    }

    /// Clear presence and class name. Safe on an empty slot.
    pub fn unregister_slot(&self, region: Region) -> Result<bool> {
        let shared = self.shared()?;
        let cleared = shared.commit("unregister_slot", |state, events| {
            Ok(clear_from(&mut state.slots, region, SlotRef::Layout(region), events))
        })?;
        if cleared {
            shared.record(EngineMetrics::record_release);
        }
        Ok(cleared)
    }

    /// Clear `region` only while `lease` is its current registration.
    pub fn release_slot(&self, region: Region, lease: SlotLease) -> Result<bool> {
        let shared = self.shared()?;
        let cleared = shared.commit("release_slot", |state, events| {
            if state.slots.lease_of(region) != Some(lease) {
                return Ok(false);
            }
            Ok(clear_from(&mut state.slots, region, SlotRef::Layout(region), events))
        })?;
        if cleared {
            shared.record(EngineMetrics::record_release);
        }
        Ok(cleared)
    }

    /// `Some` registers content under the current class name; `None` behaves
    /// like [`unregister_slot`](Self::unregister_slot).
    pub fn set_slot(
        &self,
        region: Region,
        content: Option<SlotContent>,
    ) -> Result<Option<SlotLease>> {
        let Some(content) = content else {
            return self.unregister_slot(region).map(|_| None);
        };
        let shared = self.shared()?;
        let lease = shared.commit("set_slot", |state, events| {
            let class_name = state.slots.class_name(region).to_string();
            Ok(register_into(
                &mut state.slots,
                region,
                SlotRef::Layout(region),
                content,
                class_name,
                events,
            ))
        })?;
        shared.record(EngineMetrics::record_registration);
        Ok(Some(lease))
    }

    pub fn set_class_name(&self, region: Region, class_name: impl Into<String>) -> Result<bool> {
        let class_name = class_name.into();
        self.commit("set_class_name", |state, events| {
            Ok(set_class_in(
                &mut state.slots,
                region,
                SlotRef::Layout(region),
                class_name,
                events,
            ))
        })
    }

    /// Register and hold `region` for the lifetime of the returned guard.
    pub fn acquire_slot(
        &self,
        region: Region,
        content: impl Into<SlotContent>,
        class_name: impl Into<String>,
    ) -> Result<SlotGuard> {
        let lease = self.register_slot(region, content, class_name)?;
        Ok(SlotGuard::layout(self.clone(), region, lease))
    }

    /// Open the sidebar sub-registry. Replaces any scope already open.
    pub fn open_sidebar(&self) -> Result<SidebarScope> {
        let scope = self.commit("open_sidebar", |state, events| {
            if state.sidebar.is_some() {
                events.push(LayoutEvent::SidebarClosed);
            }
            let scope = state.open_scope();
            events.push(LayoutEvent::SidebarOpened);
            Ok(scope)
        })?;
        Ok(SidebarScope::new(self.clone(), scope))
    }

    // Reads

    pub fn modes(&self) -> Result<ModeSet> {
        self.read(|state| state.modes.modes())
    }

    pub fn mode(&self, field: ModeField) -> Result<ModeValue> {
        self.read(|state| state.modes.get(field))
    }

    pub fn sizes(&self) -> Result<SizeParams> {
        self.read(|state| state.sizes.clone())
    }

    pub fn presence(&self) -> Result<SlotPresence> {
        self.read(EngineState::presence)
    }

    pub fn class_names(&self) -> Result<BTreeMap<String, String>> {
        self.read(|state| state.slots.class_name_map())
    }

    pub fn class_name(&self, region: Region) -> Result<String> {
        self.read(|state| state.slots.class_name(region).to_string())
    }

    /// Composed presentation classes for `region`.
    pub fn region_classes(&self, region: Region) -> Result<String> {
        self.read(|state| {
            region_classes(region, &state.modes.modes(), state.slots.class_name(region))
        })
    }

    pub fn slot_content(&self, region: Region) -> Result<Option<SlotContent>> {
        self.read(|state| state.slots.content(region).map(str::to_string))
    }

    pub fn is_theme_dark(&self) -> Result<bool> {
        self.read(|state| state.modes.is_theme_dark())
    }

    pub fn is_header_hidden(&self) -> Result<bool> {
        self.read(|state| state.modes.is_header_hidden())
    }

    pub fn is_footer_hidden(&self) -> Result<bool> {
        self.read(|state| state.modes.is_footer_hidden())
    }

    pub fn is_sidebar_hidden(&self) -> Result<bool> {
        self.read(|state| state.modes.is_sidebar_hidden())
    }

    pub fn is_sidebar_collapsed(&self) -> Result<bool> {
        self.read(|state| state.modes.is_sidebar_collapsed())
    }

    pub fn is_infobar_hidden(&self) -> Result<bool> {
        self.read(|state| state.modes.is_infobar_hidden())
    }

    pub fn is_infobar_collapsed(&self) -> Result<bool> {
        self.read(|state| state.modes.is_infobar_collapsed())
    }

    pub fn has_header(&self) -> Result<bool> {
        self.read(|state| state.shows(Region::Header))
    }

    pub fn has_footer(&self) -> Result<bool> {
        self.read(|state| state.shows(Region::Footer))
    }

    pub fn has_sidebar(&self) -> Result<bool> {
        self.read(|state| state.shows(Region::Sidebar))
    }

    pub fn has_infobar(&self) -> Result<bool> {
        self.read(|state| state.shows(Region::Infobar))
    }

    pub fn has_content(&self) -> Result<bool> {
        self.read(|state| state.shows(Region::Body))
    }

    pub fn geometry(&self) -> Result<Geometry> {
        self.read(EngineState::geometry)
    }

    pub fn attribute_map(&self) -> Result<AttributeMap> {
        self.read(|state| attribute_map(&state.modes.modes()))
    }

    pub fn css_variables(&self) -> Result<CssVariables> {
        self.read(EngineState::css_variables)
    }

    pub fn snapshot(&self) -> Result<LayoutSnapshot> {
        self.read(EngineState::snapshot)
    }

    /// Derive the frame to paint. Fails with [`LayoutError::MissingContent`]
    /// while the body slot is empty.
    pub fn finalize(&self) -> Result<LayoutFrame> {
        let shared = self.shared()?;
        let frame = shared.read(EngineState::frame)?;
        if let Err(err) = &frame {
            shared.reject("finalize", err);
        }
        frame
    }

    // Observers

    pub fn subscribe(&self, observer: impl LayoutObserver + 'static) -> Result<ObserverId> {
        self.shared()?.subscribe(Box::new(observer))
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&self, id: ObserverId) -> Result<bool> {
        self.shared()?.unsubscribe(id)
    }

    // Metrics

    /// `None` when metrics are disabled.
    pub fn metrics_snapshot(&self) -> Result<Option<MetricSnapshot>> {
        let shared = self.shared()?;
        let Some(metrics) = &shared.metrics else {
            return Ok(None);
        };
        let guard = metrics.lock().map_err(|_| LayoutError::Poisoned)?;
        Ok(Some(guard.snapshot(shared.started.elapsed())))
    }

    /// Write the current metrics snapshot to the logger, if both are enabled.
    pub fn log_metrics(&self) -> Result<()> {
        let shared = self.shared()?;
        if let (Some(snapshot), Some(logger)) = (self.metrics_snapshot()?, &shared.logger) {
            let _ = logger.log_event(snapshot.to_log_event(METRICS_TARGET));
        }
        Ok(())
    }
}

impl From<ModeChange> for LayoutEvent {
    fn from(change: ModeChange) -> Self {
        LayoutEvent::ModeChanged {
            field: change.field,
            from: change.from,
            to: change.to,
        }
    }
}
