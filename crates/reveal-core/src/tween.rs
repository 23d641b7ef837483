//! Frame-driven tween stepper.
//!
//! An `ActiveTween` interpolates one value from a start state to an end
//! state over a duration, shaped by an easing curve, advanced once per
//! display frame via `update`. It is deliberately decoupled from any
//! rendering surface so the same stepper drives entrance reveals, staggered
//! group members and count-up counters alike, and can be unit-tested
//! headlessly.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::interpolate::Interpolate;

/// Current state of a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenState {
    /// Tween has been created but not yet started (waiting for delay).
    Pending,
    /// Tween is actively running.
    Running,
    /// Tween has completed normally.
    Finished,
    /// Tween was cancelled before completion.
    Cancelled,
}

impl Default for TweenState {
    fn default() -> Self {
        Self::Pending
    }
}

/// An interpolation from a start value to an end value, in progress.
#[derive(Debug, Clone)]
pub struct ActiveTween<T: Interpolate + Clone> {
    /// Starting value.
    pub from: T,
    /// Target value.
    pub to: T,
    /// Total duration in milliseconds.
    pub duration_ms: f32,
    /// Delay before the tween starts in milliseconds.
    pub delay_ms: f32,
    /// Easing function for timing.
    pub easing: Easing,
    /// Time elapsed since the tween was created in milliseconds.
    pub elapsed_ms: f32,
    /// Current state of the tween.
    pub state: TweenState,
}

impl<T: Interpolate + Clone> ActiveTween<T> {
    /// Create a new tween. It starts in `Pending` if a delay is set,
    /// otherwise it is immediately `Running`.
    pub fn new(from: T, to: T, duration_ms: f32, delay_ms: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms,
            delay_ms,
            easing,
            elapsed_ms: 0.0,
            state: if delay_ms > 0.0 {
                TweenState::Pending
            } else {
                TweenState::Running
            },
        }
    }

    /// Get the current interpolated value of the tween.
    ///
    /// A cancelled tween holds the value it had at cancel time (elapsed
    /// time stops advancing), so there is no visible snap back to the
    /// start value.
    pub fn value(&self) -> T {
        match self.state {
            TweenState::Pending => self.from.clone(),
            TweenState::Finished => self.to.clone(),
            TweenState::Running | TweenState::Cancelled => {
                let eased = self.easing.evaluate(self.progress());
                self.from.interpolate(&self.to, eased)
            }
        }
    }

    /// Update the tween by advancing time.
    ///
    /// Returns `true` if the tween is still active (running or pending),
    /// `false` if it has finished or was cancelled.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        match self.state {
            TweenState::Finished | TweenState::Cancelled => false,
            TweenState::Pending => {
                self.elapsed_ms += delta_ms;
                if self.elapsed_ms >= self.delay_ms {
                    self.state = TweenState::Running;
                    // The same tick may also complete a zero-length tween.
                    if self.elapsed_ms - self.delay_ms >= self.duration_ms {
                        self.state = TweenState::Finished;
                        return false;
                    }
                }
                true
            }
            TweenState::Running => {
                self.elapsed_ms += delta_ms;
                let active_elapsed = self.elapsed_ms - self.delay_ms;
                if active_elapsed >= self.duration_ms {
                    self.state = TweenState::Finished;
                    false
                } else {
                    true
                }
            }
        }
    }

    /// Cancel the tween.
    pub fn cancel(&mut self) {
        if self.is_active() {
            self.state = TweenState::Cancelled;
        }
    }

    /// Check if this tween is still pending or running.
    pub fn is_active(&self) -> bool {
        matches!(self.state, TweenState::Pending | TweenState::Running)
    }

    /// Check if this tween has completed successfully.
    pub fn is_finished(&self) -> bool {
        self.state == TweenState::Finished
    }

    /// Get the progress of this tween (0.0 to 1.0), delay excluded.
    pub fn progress(&self) -> f32 {
        let active_elapsed = (self.elapsed_ms - self.delay_ms).max(0.0);
        if self.duration_ms > 0.0 {
            (active_elapsed / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}
