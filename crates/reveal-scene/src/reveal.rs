//! Reveal descriptors and their in-flight playback state.
//!
//! A `RevealSpec` is the declarative description of an entrance animation:
//! a set of target elements, a start and end visual state, timing and an
//! easing curve. It is immutable once constructed and consumed exactly once
//! when the reveal fires. For groups, each subsequent target starts
//! `stagger_ms` later than the previous one, so target `i` begins at
//! `delay_ms + i * stagger_ms` relative to the group start.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use reveal_core::{ActiveTween, Easing, RevealState};
use reveal_config::RevealConfig;

use crate::element::ElementId;

/// Unique identifier for a reveal playback instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevealId(pub u64);

impl RevealId {
    /// Generate a new unique reveal ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for RevealId {
    fn default() -> Self {
        Self::new()
    }
}

/// Declarative specification of a one-shot entrance animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealSpec {
    /// Target elements, in stagger order.
    pub targets: Vec<ElementId>,
    /// Visual state the targets start from.
    pub from: RevealState,
    /// Visual state the targets end at.
    pub to: RevealState,
    /// Duration of each target's interpolation in milliseconds.
    pub duration_ms: f32,
    /// Delay before the first target starts, in milliseconds.
    pub delay_ms: f32,
    /// Additional per-target delay for group reveals, in milliseconds.
    pub stagger_ms: f32,
    /// Easing curve shaping the interpolation.
    pub easing: Easing,
}

impl RevealSpec {
    /// Create a spec with no delay, no stagger and the default easing.
    pub fn new(targets: Vec<ElementId>, from: RevealState, to: RevealState) -> Self {
        Self {
            targets,
            from,
            to,
            duration_ms: 300.0,
            delay_ms: 0.0,
            stagger_ms: 0.0,
            easing: Easing::default(),
        }
    }

    /// Set the per-target duration.
    pub fn with_duration_ms(mut self, duration_ms: f32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the group delay.
    pub fn with_delay_ms(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set the per-target stagger interval.
    pub fn with_stagger_ms(mut self, stagger_ms: f32) -> Self {
        self.stagger_ms = stagger_ms;
        self
    }

    /// Set the easing curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// The fade-in-up preset: opacity 0 to 1 while rising into place.
    /// Timing comes from the configuration's image reveal settings.
    pub fn fade_in_up(target: ElementId, config: &RevealConfig) -> Self {
        Self::new(
            vec![target],
            RevealState::hidden(config.timing.rise_px),
            RevealState::resting(),
        )
        .with_duration_ms(config.timing.image_duration_ms)
        .with_delay_ms(config.timing.delay_ms)
        .with_easing(configured_easing(config))
    }

    /// The word-reveal preset: each word rises from below its line box,
    /// staggered left to right.
    pub fn word_reveal(words: Vec<ElementId>, line_height_px: f64, config: &RevealConfig) -> Self {
        Self::new(
            words,
            RevealState::hidden(line_height_px),
            RevealState::resting(),
        )
        .with_duration_ms(config.timing.text_duration_ms)
        .with_delay_ms(config.timing.delay_ms)
        .with_stagger_ms(config.timing.stagger_ms)
        .with_easing(configured_easing(config))
    }

    /// Start time of target `i` relative to the group start.
    pub fn target_start_ms(&self, index: usize) -> f32 {
        self.delay_ms + index as f32 * self.stagger_ms
    }

    /// Total playback duration of the group:
    /// `delay + duration + (n - 1) * stagger`.
    pub fn total_duration_ms(&self) -> f32 {
        let stagger_span = self.stagger_ms * self.targets.len().saturating_sub(1) as f32;
        self.delay_ms + self.duration_ms + stagger_span
    }
}

/// Resolve the configured easing name, falling back to `power3.out`.
fn configured_easing(config: &RevealConfig) -> Easing {
    Easing::from_name(&config.easing.name).unwrap_or(Easing::PowerOut { power: 3 })
}

/// A reveal that has fired and is interpolating its targets.
///
/// Targets that were unmounted at fire time hold no tween and are skipped;
/// the remaining targets animate normally.
#[derive(Debug)]
pub struct ActiveReveal {
    /// Identifier of this playback instance.
    pub id: RevealId,
    targets: Vec<ElementId>,
    tweens: Vec<Option<ActiveTween<RevealState>>>,
    cancelled: bool,
}

impl ActiveReveal {
    /// Build the per-target tweens for a firing spec.
    ///
    /// `skip` marks targets (by index) that must not animate; their slots
    /// stay empty.
    pub(crate) fn new(id: RevealId, spec: &RevealSpec, skip: &[bool]) -> Self {
        let tweens = spec
            .targets
            .iter()
            .enumerate()
            .map(|(i, _)| {
                if skip.get(i).copied().unwrap_or(false) {
                    None
                } else {
                    Some(ActiveTween::new(
                        spec.from,
                        spec.to,
                        spec.duration_ms,
                        spec.target_start_ms(i),
                        spec.easing,
                    ))
                }
            })
            .collect();

        Self {
            id,
            targets: spec.targets.clone(),
            tweens,
            cancelled: false,
        }
    }

    /// Advance all target tweens.
    ///
    /// Returns `true` while at least one tween is still active.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        let mut any_active = false;
        for tween in self.tweens.iter_mut().flatten() {
            if tween.update(delta_ms) {
                any_active = true;
            }
        }
        any_active
    }

    /// Current interpolated state for a target element, or `None` if the
    /// element is not an animating member of this reveal.
    pub fn value_for(&self, element: ElementId) -> Option<RevealState> {
        let index = self.targets.iter().position(|t| *t == element)?;
        self.tweens[index].as_ref().map(|tween| tween.value())
    }

    /// Targets of this reveal, in stagger order.
    pub fn targets(&self) -> &[ElementId] {
        &self.targets
    }

    /// Milliseconds until target `index` starts, as armed at fire time.
    pub fn target_delay_ms(&self, index: usize) -> Option<f32> {
        self.tweens.get(index)?.as_ref().map(|t| t.delay_ms)
    }

    /// Cancel the tween driving one target (element unmounted mid-flight).
    pub(crate) fn cancel_target(&mut self, element: ElementId) {
        if let Some(index) = self.targets.iter().position(|t| *t == element) {
            if let Some(tween) = self.tweens[index].as_mut() {
                tween.cancel();
            }
        }
    }

    /// Cancel every remaining tween.
    pub(crate) fn cancel(&mut self) {
        for tween in self.tweens.iter_mut().flatten() {
            tween.cancel();
        }
        self.cancelled = true;
    }

    /// True if the reveal was cancelled rather than allowed to finish.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// True while any target tween is pending or running.
    pub fn is_active(&self) -> bool {
        self.tweens
            .iter()
            .flatten()
            .any(|tween| tween.is_active())
    }
}
