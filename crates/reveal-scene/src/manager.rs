//! Reveal manager: fires each entrance animation exactly once.
//!
//! The manager is the coordination point between visibility signals and
//! playback. It holds:
//! - armed one-shot triggers waiting for their visibility signal
//! - active reveals being advanced each frame
//! - the set of elements that have already been revealed
//!
//! The central correctness property is idempotence: an element is revealed
//! at most once per lifetime. An armed trigger is consumed when it fires,
//! and any later attempt to play an already-revealed element is skipped,
//! so scroll-up/scroll-down oscillation can never re-trigger an entrance
//! animation.
//!
//! # Usage
//!
//! ```ignore
//! let mut manager = RevealManager::new();
//! let signal = observer.observe(section, 0.2, true);
//! manager.play_on_visible(signal, RevealSpec::fade_in_up(section, &config));
//!
//! // Each frame:
//! observer.process(&store, &viewport);
//! manager.update(16.67, &store);
//! if let Some(state) = manager.value_for(section, &store) {
//!     // apply state to rendering
//! }
//! ```

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use reveal_core::RevealState;

use crate::element::{ElementId, ElementStore};
use crate::events::{EventQueue, RevealEvent};
use crate::observer::VisibilitySignal;
use crate::reveal::{ActiveReveal, RevealId, RevealSpec};

/// A descriptor armed on a visibility signal, waiting to fire.
#[derive(Debug)]
struct ArmedTrigger {
    signal: VisibilitySignal,
    spec: RevealSpec,
}

/// Central coordinator for one-shot reveal playback.
#[derive(Debug, Default)]
pub struct RevealManager {
    /// Triggers waiting for their visibility signal to become true.
    armed: Vec<ArmedTrigger>,

    /// Reveals currently interpolating, indexed by their ID.
    active: HashMap<RevealId, ActiveReveal>,

    /// Index from element to its in-flight reveal. At most one reveal may
    /// be in flight per element.
    element_index: HashMap<ElementId, RevealId>,

    /// Elements that have already been revealed this lifetime.
    played: HashSet<ElementId>,

    /// Queue of events emitted during updates.
    events: EventQueue,
}

impl RevealManager {
    /// Create a new manager with nothing armed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a descriptor to fire when the signal first becomes true.
    ///
    /// The trigger is consumed when it fires; later signal changes are
    /// ignored. Arming a second descriptor for targets that have already
    /// been revealed results in those targets being skipped at fire time.
    pub fn play_on_visible(&mut self, signal: VisibilitySignal, spec: RevealSpec) {
        self.armed.push(ArmedTrigger { signal, spec });
    }

    /// Fire a descriptor immediately.
    ///
    /// Targets that are unmounted, already revealed, or currently part of
    /// another in-flight reveal are skipped silently (an event records the
    /// skip); the remaining targets animate. Returns `None` when nothing
    /// was startable; in that case the `TargetSkipped` events reference a
    /// reveal that never started and gets no `Started` or `Ended` event.
    pub fn play(&mut self, spec: RevealSpec, store: &ElementStore) -> Option<RevealId> {
        if spec.targets.is_empty() {
            debug!("reveal spec with no targets ignored");
            return None;
        }

        let id = RevealId::new();
        let mut skip = vec![false; spec.targets.len()];
        let mut startable = 0usize;

        for (i, target) in spec.targets.iter().enumerate() {
            if !store.is_mounted(*target) {
                skip[i] = true;
                warn!(element = target.0, "reveal target unmounted at fire time, skipping");
                self.events.push(RevealEvent::TargetSkipped {
                    reveal_id: id,
                    element: *target,
                });
            } else if self.played.contains(target) || self.element_index.contains_key(target) {
                skip[i] = true;
                warn!(element = target.0, "reveal target already revealed, skipping");
                self.events.push(RevealEvent::TargetSkipped {
                    reveal_id: id,
                    element: *target,
                });
            } else {
                startable += 1;
            }
        }

        if startable == 0 {
            return None;
        }

        for (i, target) in spec.targets.iter().enumerate() {
            if !skip[i] {
                self.played.insert(*target);
                self.element_index.insert(*target, id);
            }
        }

        debug!(
            reveal = id.0,
            targets = startable,
            duration_ms = spec.duration_ms,
            "reveal started"
        );
        self.events.push(RevealEvent::Started { reveal_id: id });
        self.active.insert(id, ActiveReveal::new(id, &spec, &skip));

        Some(id)
    }

    /// Advance the manager by one frame.
    ///
    /// Polls armed triggers (firing those whose signal has become true),
    /// then advances every active reveal. Finished reveals are cleaned up
    /// and reported through the event queue.
    pub fn update(&mut self, delta_ms: f32, store: &ElementStore) {
        // Fire armed triggers. Consuming the trigger on fire is what makes
        // playback one-shot: there is nothing left to re-fire.
        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.armed.len() {
            if self.armed[i].signal.get() {
                fired.push(self.armed.swap_remove(i).spec);
            } else {
                i += 1;
            }
        }
        for spec in fired {
            self.play(spec, store);
        }

        // Advance active reveals.
        let mut finished = Vec::new();
        for (id, reveal) in self.active.iter_mut() {
            if !reveal.update(delta_ms) {
                finished.push(*id);
            }
        }

        for id in finished {
            if let Some(reveal) = self.active.remove(&id) {
                for target in reveal.targets() {
                    if self.element_index.get(target) == Some(&id) {
                        self.element_index.remove(target);
                    }
                }
                let event = if reveal.is_cancelled() {
                    RevealEvent::Cancelled { reveal_id: id }
                } else {
                    RevealEvent::Ended { reveal_id: id }
                };
                debug!(reveal = id.0, cancelled = reveal.is_cancelled(), "reveal finished");
                self.events.push(event);
            }
        }
    }

    /// Current interpolated state for an element, or `None` when the
    /// element is unmounted or not part of an in-flight reveal.
    pub fn value_for(&self, element: ElementId, store: &ElementStore) -> Option<RevealState> {
        if !store.is_mounted(element) {
            return None;
        }
        let id = self.element_index.get(&element)?;
        self.active.get(id)?.value_for(element)
    }

    /// Cancel an in-flight reveal. It is reported as `Cancelled` on the
    /// next update.
    pub fn cancel(&mut self, id: RevealId) {
        if let Some(reveal) = self.active.get_mut(&id) {
            reveal.cancel();
        }
    }

    /// Release an element that is being unmounted.
    ///
    /// Cancels the element's pending interpolation (other targets of the
    /// same group keep animating) and forgets its reveal history, freeing
    /// the identity entirely.
    pub fn release_element(&mut self, element: ElementId) {
        if let Some(id) = self.element_index.remove(&element) {
            if let Some(reveal) = self.active.get_mut(&id) {
                reveal.cancel_target(element);
            }
        }
        self.played.remove(&element);
    }

    /// True once an element's entrance animation has fired.
    pub fn has_played(&self, element: ElementId) -> bool {
        self.played.contains(&element)
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> Vec<RevealEvent> {
        self.events.drain().collect()
    }

    /// Number of triggers still waiting on their signal.
    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    /// Number of reveals currently interpolating.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// True when nothing is armed and nothing is animating.
    pub fn is_idle(&self) -> bool {
        self.armed.is_empty() && self.active.is_empty()
    }
}
