//! Reveal lifecycle events.
//!
//! Events are collected while the manager updates and can be polled
//! afterwards to react to reveals starting, finishing, or skipping targets
//! that disappeared from the element store.
//!
//! # Usage
//!
//! ```ignore
//! use reveal_scene::{RevealManager, RevealEvent};
//!
//! let mut manager = RevealManager::new();
//! // arm triggers...
//! manager.update(16.67, &store);
//!
//! for event in manager.drain_events() {
//!     match event {
//!         RevealEvent::Ended { reveal_id } => println!("reveal {:?} done", reveal_id),
//!         _ => {}
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::element::ElementId;
use crate::reveal::RevealId;

/// Event emitted when a reveal changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RevealEvent {
    /// A reveal fired and began playing.
    Started {
        /// The playback instance that started.
        reveal_id: RevealId,
    },
    /// A reveal finished playing all of its targets.
    Ended {
        /// The playback instance that finished.
        reveal_id: RevealId,
    },
    /// A reveal was cancelled before completion.
    Cancelled {
        /// The playback instance that was cancelled.
        reveal_id: RevealId,
    },
    /// A target was skipped because it was unmounted, or had already
    /// been revealed, at fire time.
    ///
    /// When every target of a group is skipped, the group never starts:
    /// its skip events carry a `reveal_id` that will see no `Started` or
    /// `Ended` event.
    TargetSkipped {
        /// The playback instance the target belonged to.
        reveal_id: RevealId,
        /// The target that did not animate.
        element: ElementId,
    },
}

impl RevealEvent {
    /// The playback instance this event belongs to.
    pub fn reveal_id(&self) -> RevealId {
        match self {
            Self::Started { reveal_id }
            | Self::Ended { reveal_id }
            | Self::Cancelled { reveal_id }
            | Self::TargetSkipped { reveal_id, .. } => *reveal_id,
        }
    }

    /// Check if this is a "started" event.
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started { .. })
    }

    /// Check if this is an "ended" event.
    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended { .. })
    }
}

/// Queue for collecting reveal events during update cycles.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<RevealEvent>,
}

impl EventQueue {
    /// Create a new empty event queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event onto the queue.
    pub fn push(&mut self, event: RevealEvent) {
        self.events.push_back(event);
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get the number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Pop the next event from the queue.
    pub fn pop(&mut self) -> Option<RevealEvent> {
        self.events.pop_front()
    }

    /// Drain all events from the queue, returning an iterator.
    pub fn drain(&mut self) -> impl Iterator<Item = RevealEvent> + '_ {
        self.events.drain(..)
    }

    /// Peek at the next event without removing it.
    pub fn peek(&self) -> Option<&RevealEvent> {
        self.events.front()
    }

    /// Clear all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        let started = RevealEvent::Started {
            reveal_id: RevealId(1),
        };
        assert_eq!(started.reveal_id(), RevealId(1));
        assert!(started.is_started());
        assert!(!started.is_ended());

        let skipped = RevealEvent::TargetSkipped {
            reveal_id: RevealId(2),
            element: ElementId(9),
        };
        assert_eq!(skipped.reveal_id(), RevealId(2));
        assert!(!skipped.is_started());
    }

    #[test]
    fn test_queue_operations() {
        let mut queue = EventQueue::new();
        assert!(queue.is_empty());

        queue.push(RevealEvent::Started {
            reveal_id: RevealId(1),
        });
        queue.push(RevealEvent::Ended {
            reveal_id: RevealId(1),
        });

        assert_eq!(queue.len(), 2);
        assert!(queue.peek().unwrap().is_started());

        let first = queue.pop().unwrap();
        assert!(first.is_started());
        let second = queue.pop().unwrap();
        assert!(second.is_ended());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_queue_drain() {
        let mut queue = EventQueue::new();
        queue.push(RevealEvent::Started {
            reveal_id: RevealId(1),
        });
        queue.push(RevealEvent::Cancelled {
            reveal_id: RevealId(1),
        });

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(events.len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = RevealEvent::TargetSkipped {
            reveal_id: RevealId(42),
            element: ElementId(7),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("target_skipped"));

        let parsed: RevealEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
