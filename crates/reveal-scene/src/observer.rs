//! Visibility observer: viewport-entry signals for watched elements.
//!
//! The observer wraps the intersection math from `reveal-core` and reports,
//! per element, whether it has entered the viewport past a configurable
//! threshold. With `fire_once` the resulting signal is a one-shot latch:
//! once it has become true it never reverts, regardless of further scroll
//! movement. Without `fire_once` the signal is a live visibility flag.
//!
//! The observer knows nothing about animation; it only flips signals. The
//! reveal manager consumes them.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use reveal_core::{Viewport, intersection_ratio};

use crate::element::{ElementId, ElementStore};

/// A shared boolean visibility signal.
///
/// Cheap to clone; all clones observe the same value. Signals are produced
/// by [`VisibilityObserver::observe`] and consumed by the reveal manager,
/// but `new` and `set` are public so tests and custom visibility sources can
/// drive a signal directly.
#[derive(Debug, Clone, Default)]
pub struct VisibilitySignal {
    inner: Rc<Cell<bool>>,
}

impl VisibilitySignal {
    /// Create a signal that is initially false.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the signal.
    pub fn get(&self) -> bool {
        self.inner.get()
    }

    /// Set the signal value.
    pub fn set(&self, value: bool) {
        self.inner.set(value);
    }
}

/// One watched element: threshold, latch mode and the signal it drives.
#[derive(Debug)]
struct Observation {
    threshold: f64,
    fire_once: bool,
    signal: VisibilitySignal,
    latched: bool,
}

/// Watches mounted elements and flips their visibility signals as the
/// viewport scrolls.
#[derive(Debug, Default)]
pub struct VisibilityObserver {
    observations: HashMap<ElementId, Observation>,
}

impl VisibilityObserver {
    /// Create an observer with no observations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing an element.
    ///
    /// `threshold` is the fraction of the element's bounding box that must
    /// intersect the viewport before the signal fires; it is clamped to
    /// `[0, 1]`. The boundary is inclusive: a ratio exactly equal to the
    /// threshold counts as entered.
    ///
    /// The element does not need to be mounted yet; observing an absent
    /// element is a no-op until it appears in the store. Re-observing an
    /// element replaces the previous observation (and resets its latch).
    pub fn observe(
        &mut self,
        element: ElementId,
        threshold: f64,
        fire_once: bool,
    ) -> VisibilitySignal {
        let signal = VisibilitySignal::new();
        self.observations.insert(
            element,
            Observation {
                threshold: threshold.clamp(0.0, 1.0),
                fire_once,
                signal: signal.clone(),
                latched: false,
            },
        );
        signal
    }

    /// Re-evaluate every observation against the current viewport.
    ///
    /// This is the headless counterpart of an intersection-observer
    /// callback delivery: call it whenever the viewport scrolls or element
    /// layout changes.
    pub fn process(&mut self, store: &ElementStore, viewport: &Viewport) {
        for (element, observation) in self.observations.iter_mut() {
            let entered = match store.bounds(*element) {
                Some(bounds) => {
                    let ratio = intersection_ratio(bounds, viewport);
                    // A zero threshold still requires actual intersection;
                    // an element with no viewport overlap has not entered.
                    ratio >= observation.threshold && (observation.threshold > 0.0 || ratio > 0.0)
                }
                // Unmounted elements are never visible; a latched signal
                // stays latched.
                None => false,
            };

            if observation.fire_once {
                if entered && !observation.latched {
                    observation.latched = true;
                    observation.signal.set(true);
                    trace!(element = element.0, "visibility signal latched");
                }
            } else {
                observation.signal.set(entered);
            }
        }
    }

    /// Stop observing an element. Returns `false` if it was not observed.
    ///
    /// The signal handed out by `observe` keeps its last value; it just
    /// stops being updated.
    pub fn disconnect(&mut self, element: ElementId) -> bool {
        self.observations.remove(&element).is_some()
    }

    /// Release every observation.
    pub fn disconnect_all(&mut self) {
        self.observations.clear();
    }

    /// Check whether an element is currently observed.
    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observations.contains_key(&element)
    }

    /// Number of active observations.
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::ElementBounds;

    #[test]
    fn test_signal_fires_on_entry() {
        let mut store = ElementStore::new();
        let mut observer = VisibilityObserver::new();
        let mut viewport = Viewport::new(900.0);

        // Element below the fold: 200px tall, starting at 1000.
        let element = store.insert(ElementBounds::new(1000.0, 200.0));
        let signal = observer.observe(element, 0.2, true);

        observer.process(&store, &viewport);
        assert!(!signal.get());

        // Scroll until ratio 0.25 > threshold 0.2.
        viewport.scroll_by(150.0);
        observer.process(&store, &viewport);
        assert!(signal.get());
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let mut store = ElementStore::new();
        let mut observer = VisibilityObserver::new();

        let element = store.insert(ElementBounds::new(900.0, 100.0));
        let signal = observer.observe(element, 0.2, false);

        // Exactly 20 of 100 px visible: ratio == threshold, counts as entered.
        let viewport = Viewport {
            scroll_top: 20.0,
            height: 900.0,
        };
        observer.process(&store, &viewport);
        assert!(signal.get());

        // A hair below the threshold does not.
        let viewport = Viewport {
            scroll_top: 19.9,
            height: 900.0,
        };
        observer.process(&store, &viewport);
        assert!(!signal.get());
    }

    #[test]
    fn test_fire_once_latches() {
        let mut store = ElementStore::new();
        let mut observer = VisibilityObserver::new();
        let mut viewport = Viewport::new(900.0);

        let element = store.insert(ElementBounds::new(1000.0, 200.0));
        let signal = observer.observe(element, 0.2, true);

        viewport.scroll_by(400.0);
        observer.process(&store, &viewport);
        assert!(signal.get());

        // Scroll back up: the latch must hold.
        viewport.scroll_by(-400.0);
        observer.process(&store, &viewport);
        assert!(signal.get());
    }

    #[test]
    fn test_live_signal_toggles() {
        let mut store = ElementStore::new();
        let mut observer = VisibilityObserver::new();
        let mut viewport = Viewport::new(900.0);

        let element = store.insert(ElementBounds::new(1000.0, 200.0));
        let signal = observer.observe(element, 0.5, false);

        viewport.scroll_by(400.0);
        observer.process(&store, &viewport);
        assert!(signal.get());

        viewport.scroll_by(-400.0);
        observer.process(&store, &viewport);
        assert!(!signal.get());
    }

    #[test]
    fn test_observe_unmounted_element_is_noop() {
        let mut store = ElementStore::new();
        let mut observer = VisibilityObserver::new();
        let viewport = Viewport::new(900.0);

        // Not in the store at all.
        let absent = ElementId::new();
        let signal = observer.observe(absent, 0.2, true);

        observer.process(&store, &viewport);
        assert!(!signal.get());

        // A mounted element observed the same way fires normally.
        let mounted = store.insert(ElementBounds::new(100.0, 50.0));
        let mounted_signal = observer.observe(mounted, 0.2, true);
        observer.process(&store, &viewport);
        assert!(mounted_signal.get());
        assert!(!signal.get());
    }

    #[test]
    fn test_unmount_keeps_latch() {
        let mut store = ElementStore::new();
        let mut observer = VisibilityObserver::new();
        let viewport = Viewport::new(900.0);

        let element = store.insert(ElementBounds::new(100.0, 50.0));
        let signal = observer.observe(element, 0.2, true);
        observer.process(&store, &viewport);
        assert!(signal.get());

        store.remove(element);
        observer.process(&store, &viewport);
        assert!(signal.get());
    }

    #[test]
    fn test_disconnect_stops_updates() {
        let mut store = ElementStore::new();
        let mut observer = VisibilityObserver::new();
        let mut viewport = Viewport::new(900.0);

        let element = store.insert(ElementBounds::new(100.0, 50.0));
        let signal = observer.observe(element, 0.2, false);
        observer.process(&store, &viewport);
        assert!(signal.get());

        assert!(observer.disconnect(element));
        assert!(!observer.is_observing(element));

        // Signal keeps its last value but no longer updates.
        viewport.scroll_by(5000.0);
        observer.process(&store, &viewport);
        assert!(signal.get());

        assert!(!observer.disconnect(element));
    }

    #[test]
    fn test_zero_threshold_requires_intersection() {
        let mut store = ElementStore::new();
        let mut observer = VisibilityObserver::new();
        let mut viewport = Viewport::new(900.0);

        // Far below the fold: zero overlap with the viewport.
        let element = store.insert(ElementBounds::new(10_000.0, 200.0));
        let signal = observer.observe(element, 0.0, true);

        observer.process(&store, &viewport);
        assert!(!signal.get());

        // The first pixel of overlap fires it.
        viewport.scroll_by(9_101.0);
        observer.process(&store, &viewport);
        assert!(signal.get());
    }

    #[test]
    fn test_threshold_clamped() {
        let mut store = ElementStore::new();
        let mut observer = VisibilityObserver::new();
        let viewport = Viewport::new(900.0);

        // A threshold above 1.0 clamps to 1.0 (fully visible).
        let element = store.insert(ElementBounds::new(100.0, 50.0));
        let signal = observer.observe(element, 2.5, false);
        observer.process(&store, &viewport);
        assert!(signal.get());
    }
}
