//! Scroll-trigger registry: scroll-position-linked reveal triggers.
//!
//! Some sections fire on scroll position rather than intersection ratio:
//! their trigger record binds an element to a descriptor and a start window
//! ("the element's top edge crosses `start_offset_px` above the viewport
//! bottom"). The provider owns every record and tears them all down
//! together when the page unmounts, so no stale trigger can outlive it.
//!
//! The provider is an explicit service object. Sections register through a
//! [`RegistryHandle`], a weak reference handed out by the provider; using a
//! handle after the provider is gone (or torn down) fails fast with
//! [`RegistryError::OutsideProvider`] rather than silently leaking a
//! trigger.
//!
//! Per-record life cycle: `Pending → Played`, terminal. A record plays once
//! when its start line is crossed, in either scroll direction, and never
//! again on reverse or re-entry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use reveal_core::Viewport;
use reveal_config::RevealConfig;

use crate::element::{ElementId, ElementStore};
use crate::manager::RevealManager;
use crate::reveal::RevealSpec;

/// Default distance above the viewport bottom at which triggers fire.
pub const DEFAULT_START_OFFSET_PX: f64 = 100.0;

/// Errors surfaced by trigger registration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The handle's provider has been dropped or torn down.
    #[error("scroll trigger registration used outside an active provider")]
    OutsideProvider,
    /// The element already has a trigger record; records are keyed by
    /// element identity and never shared.
    #[error("element {0} already has a registered scroll trigger")]
    AlreadyRegistered(u64),
}

/// State of one trigger record. Terminal once `Played`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerState {
    /// Waiting for the element's top edge to cross the start line.
    #[default]
    Pending,
    /// The animation has fired; the record is inert.
    Played,
}

/// One registered (element, descriptor) pair.
#[derive(Debug)]
struct TriggerRecord {
    /// The descriptor, consumed when the record fires.
    spec: Option<RevealSpec>,
    state: TriggerState,
}

#[derive(Debug, Default)]
struct ProviderInner {
    records: HashMap<ElementId, TriggerRecord>,
    /// Registrations that arrived before initialization completed.
    deferred: Vec<(ElementId, RevealSpec)>,
    start_offset_px: f64,
    initialized: bool,
    disposed: bool,
}

/// Owner of all scroll-linked trigger records.
#[derive(Debug)]
pub struct ScrollTriggerProvider {
    inner: Rc<RefCell<ProviderInner>>,
}

/// A weak registration handle handed to sections by the provider.
///
/// Cheap to clone. All registrations made through a handle land in the
/// owning provider's record list.
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    inner: Weak<RefCell<ProviderInner>>,
}

impl Default for ScrollTriggerProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollTriggerProvider {
    /// Create a provider with the default start offset.
    pub fn new() -> Self {
        Self::with_start_offset(DEFAULT_START_OFFSET_PX)
    }

    /// Create a provider with an explicit start offset in pixels.
    pub fn with_start_offset(start_offset_px: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ProviderInner {
                start_offset_px,
                ..ProviderInner::default()
            })),
        }
    }

    /// Create a provider configured from `reveal.toml` settings.
    pub fn from_config(config: &RevealConfig) -> Self {
        Self::with_start_offset(config.trigger.start_offset_px)
    }

    /// Hand out a registration handle for sections to use.
    pub fn handle(&self) -> RegistryHandle {
        RegistryHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Complete initialization of the underlying scroll tracking.
    ///
    /// Idempotent: the first call flips the `initialized` flag and flushes
    /// any deferred registrations into live records; repeat calls do
    /// nothing. Registrations arriving before this call are queued rather
    /// than rejected.
    pub fn ensure_initialized(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.initialized || inner.disposed {
            return;
        }
        inner.initialized = true;

        let deferred = std::mem::take(&mut inner.deferred);
        let flushed = deferred.len();
        for (element, spec) in deferred {
            if inner.records.contains_key(&element) {
                warn!(element = element.0, "duplicate deferred trigger dropped");
                continue;
            }
            inner.records.insert(
                element,
                TriggerRecord {
                    spec: Some(spec),
                    state: TriggerState::Pending,
                },
            );
        }
        debug!(flushed, "scroll trigger registry initialized");
    }

    /// Whether initialization has completed.
    pub fn is_initialized(&self) -> bool {
        self.inner.borrow().initialized
    }

    /// Evaluate every pending record against the current scroll position.
    ///
    /// A record fires when its element's top edge is at or above
    /// `viewport_bottom - start_offset_px`. Firing consumes the descriptor,
    /// hands it to the manager for playback and moves the record to
    /// `Played`. Unmounted elements stay pending until they appear.
    pub fn on_scroll(
        &self,
        viewport: &Viewport,
        store: &ElementStore,
        manager: &mut RevealManager,
    ) {
        let mut inner = self.inner.borrow_mut();
        if inner.disposed || !inner.initialized {
            return;
        }

        let start_line = viewport.bottom() - inner.start_offset_px;
        let mut fired = Vec::new();

        for (element, record) in inner.records.iter_mut() {
            if record.state != TriggerState::Pending {
                continue;
            }
            let Some(bounds) = store.bounds(*element) else {
                continue;
            };
            if bounds.top <= start_line {
                record.state = TriggerState::Played;
                if let Some(spec) = record.spec.take() {
                    debug!(element = element.0, "scroll trigger fired");
                    fired.push(spec);
                }
            }
        }
        drop(inner);

        for spec in fired {
            manager.play(spec, store);
        }
    }

    /// Release every trigger record and refuse further registrations.
    ///
    /// This is the single cancellation point for registry-owned triggers;
    /// call it when the owning page unmounts. Idempotent. After teardown no
    /// scroll movement can fire any previously registered descriptor.
    pub fn teardown_all(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.disposed {
            return;
        }
        let released = inner.records.len() + inner.deferred.len();
        inner.records.clear();
        inner.deferred.clear();
        inner.disposed = true;
        debug!(released, "scroll trigger registry torn down");
    }

    /// State of an element's record, if one exists.
    pub fn trigger_state(&self, element: ElementId) -> Option<TriggerState> {
        self.inner.borrow().records.get(&element).map(|r| r.state)
    }

    /// Number of records currently held (pending and played).
    pub fn record_count(&self) -> usize {
        self.inner.borrow().records.len()
    }

    /// Number of registrations waiting for initialization.
    pub fn deferred_count(&self) -> usize {
        self.inner.borrow().deferred.len()
    }
}

impl Drop for ScrollTriggerProvider {
    fn drop(&mut self) {
        // Unmount without an explicit teardown still releases everything.
        self.teardown_all();
    }
}

impl RegistryHandle {
    /// Register an (element, descriptor) pair with the owning provider.
    ///
    /// Before initialization completes the registration is queued and
    /// flushed later; it never fails for being early. It does fail when the
    /// provider is gone or torn down (`OutsideProvider`) or when the
    /// element already has a record (`AlreadyRegistered`).
    pub fn register(&self, element: ElementId, spec: RevealSpec) -> Result<(), RegistryError> {
        let inner = self.inner.upgrade().ok_or(RegistryError::OutsideProvider)?;
        let mut inner = inner.borrow_mut();

        if inner.disposed {
            return Err(RegistryError::OutsideProvider);
        }
        if inner.records.contains_key(&element)
            || inner.deferred.iter().any(|(e, _)| *e == element)
        {
            return Err(RegistryError::AlreadyRegistered(element.0));
        }

        if !inner.initialized {
            inner.deferred.push((element, spec));
            debug!(element = element.0, "trigger registration deferred until init");
        } else {
            inner.records.insert(
                element,
                TriggerRecord {
                    spec: Some(spec),
                    state: TriggerState::Pending,
                },
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::{Easing, ElementBounds, RevealState};

    fn spec_for(element: ElementId) -> RevealSpec {
        RevealSpec::new(
            vec![element],
            RevealState::hidden(30.0),
            RevealState::resting(),
        )
        .with_duration_ms(100.0)
        .with_easing(Easing::Linear)
    }

    fn setup() -> (ElementStore, RevealManager, Viewport) {
        (ElementStore::new(), RevealManager::new(), Viewport::new(900.0))
    }

    #[test]
    fn test_fires_when_top_crosses_start_line() {
        let (mut store, mut manager, mut viewport) = setup();
        let element = store.insert(ElementBounds::new(1000.0, 300.0));

        let provider = ScrollTriggerProvider::new();
        provider.ensure_initialized();
        provider.handle().register(element, spec_for(element)).unwrap();

        // Start line is viewport bottom - 100 = 800; element top at 1000.
        provider.on_scroll(&viewport, &store, &mut manager);
        assert_eq!(provider.trigger_state(element), Some(TriggerState::Pending));
        assert_eq!(manager.active_count(), 0);

        // Scroll down 200: start line 1000, element top crosses it.
        viewport.scroll_by(200.0);
        provider.on_scroll(&viewport, &store, &mut manager);
        assert_eq!(provider.trigger_state(element), Some(TriggerState::Played));
        manager.update(16.67, &store);
        assert_eq!(manager.active_count(), 1);
    }

    #[test]
    fn test_plays_once_and_never_re_enters() {
        let (mut store, mut manager, mut viewport) = setup();
        let element = store.insert(ElementBounds::new(1000.0, 300.0));

        let provider = ScrollTriggerProvider::new();
        provider.ensure_initialized();
        provider.handle().register(element, spec_for(element)).unwrap();

        viewport.scroll_by(500.0);
        provider.on_scroll(&viewport, &store, &mut manager);

        // Scroll away and back across the line repeatedly.
        viewport.scroll_by(-500.0);
        provider.on_scroll(&viewport, &store, &mut manager);
        viewport.scroll_by(500.0);
        provider.on_scroll(&viewport, &store, &mut manager);

        manager.update(1000.0, &store);
        manager.update(1000.0, &store);
        let starts = manager
            .drain_events()
            .iter()
            .filter(|e| e.is_started())
            .count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn test_registration_before_init_is_deferred() {
        let (mut store, mut manager, mut viewport) = setup();
        let element = store.insert(ElementBounds::new(100.0, 50.0));

        let provider = ScrollTriggerProvider::new();
        let handle = provider.handle();

        // Registering before init queues instead of failing.
        handle.register(element, spec_for(element)).unwrap();
        assert_eq!(provider.deferred_count(), 1);
        assert_eq!(provider.record_count(), 0);

        // Scrolling before init does nothing.
        viewport.scroll_by(500.0);
        provider.on_scroll(&viewport, &store, &mut manager);
        assert_eq!(manager.active_count(), 0);

        provider.ensure_initialized();
        assert_eq!(provider.deferred_count(), 0);
        assert_eq!(provider.record_count(), 1);

        provider.on_scroll(&viewport, &store, &mut manager);
        assert_eq!(provider.trigger_state(element), Some(TriggerState::Played));
    }

    #[test]
    fn test_ensure_initialized_is_idempotent() {
        let provider = ScrollTriggerProvider::new();
        provider.ensure_initialized();
        provider.ensure_initialized();
        assert!(provider.is_initialized());
    }

    #[test]
    fn test_duplicate_element_rejected() {
        let (mut store, _, _) = setup();
        let element = store.insert(ElementBounds::new(100.0, 50.0));

        let provider = ScrollTriggerProvider::new();
        provider.ensure_initialized();
        let handle = provider.handle();

        handle.register(element, spec_for(element)).unwrap();
        let err = handle.register(element, spec_for(element)).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered(element.0));
    }

    #[test]
    fn test_teardown_completeness() {
        let (mut store, mut manager, mut viewport) = setup();
        let a = store.insert(ElementBounds::new(1000.0, 100.0));
        let b = store.insert(ElementBounds::new(2000.0, 100.0));

        let provider = ScrollTriggerProvider::new();
        provider.ensure_initialized();
        let handle = provider.handle();
        handle.register(a, spec_for(a)).unwrap();
        handle.register(b, spec_for(b)).unwrap();

        provider.teardown_all();
        assert_eq!(provider.record_count(), 0);

        // No scroll movement may fire any previously registered descriptor.
        viewport.scroll_by(5000.0);
        provider.on_scroll(&viewport, &store, &mut manager);
        manager.update(1000.0, &store);
        assert!(manager.drain_events().is_empty());
    }

    #[test]
    fn test_register_after_teardown_fails_fast() {
        let (mut store, _, _) = setup();
        let element = store.insert(ElementBounds::new(100.0, 50.0));

        let provider = ScrollTriggerProvider::new();
        provider.ensure_initialized();
        let handle = provider.handle();

        provider.teardown_all();
        let err = handle.register(element, spec_for(element)).unwrap_err();
        assert_eq!(err, RegistryError::OutsideProvider);
    }

    #[test]
    fn test_handle_outlives_provider() {
        let (mut store, _, _) = setup();
        let element = store.insert(ElementBounds::new(100.0, 50.0));

        let handle = {
            let provider = ScrollTriggerProvider::new();
            provider.ensure_initialized();
            provider.handle()
        };

        // The provider is dropped; the handle must fail fast.
        let err = handle.register(element, spec_for(element)).unwrap_err();
        assert_eq!(err, RegistryError::OutsideProvider);
    }

    #[test]
    fn test_unmounted_element_stays_pending() {
        let (mut store, mut manager, mut viewport) = setup();
        let element = store.insert(ElementBounds::new(1000.0, 100.0));

        let provider = ScrollTriggerProvider::new();
        provider.ensure_initialized();
        provider.handle().register(element, spec_for(element)).unwrap();

        store.remove(element);
        viewport.scroll_by(5000.0);
        provider.on_scroll(&viewport, &store, &mut manager);

        // Record survives, but an unmounted element cannot fire.
        assert_eq!(provider.trigger_state(element), Some(TriggerState::Pending));
        assert_eq!(manager.active_count(), 0);
    }

    #[test]
    fn test_custom_start_offset() {
        let (mut store, mut manager, viewport) = setup();
        // Element top at 850; with offset 100 the start line is 800, so it
        // does not fire. With offset 50 the line is 850, inclusive.
        let element = store.insert(ElementBounds::new(850.0, 100.0));

        let strict = ScrollTriggerProvider::with_start_offset(100.0);
        strict.ensure_initialized();
        strict.handle().register(element, spec_for(element)).unwrap();
        strict.on_scroll(&viewport, &store, &mut manager);
        assert_eq!(strict.trigger_state(element), Some(TriggerState::Pending));

        let loose = ScrollTriggerProvider::with_start_offset(50.0);
        loose.ensure_initialized();
        // Providers are independent; the same element can be registered in
        // a second provider.
        loose.handle().register(element, spec_for(element)).unwrap();
        loose.on_scroll(&viewport, &store, &mut manager);
        assert_eq!(loose.trigger_state(element), Some(TriggerState::Played));
    }

    #[test]
    fn test_from_config_uses_trigger_offset() {
        let mut config = RevealConfig::default();
        config.trigger.start_offset_px = 250.0;

        let (mut store, mut manager, viewport) = setup();
        let element = store.insert(ElementBounds::new(700.0, 100.0));

        let provider = ScrollTriggerProvider::from_config(&config);
        provider.ensure_initialized();
        provider.handle().register(element, spec_for(element)).unwrap();

        // Start line 900 - 250 = 650 < top 700: pending.
        provider.on_scroll(&viewport, &store, &mut manager);
        assert_eq!(provider.trigger_state(element), Some(TriggerState::Pending));
    }
}
