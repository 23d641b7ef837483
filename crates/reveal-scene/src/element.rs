//! Element identity and the store of mounted elements.
//!
//! The store is the headless stand-in for the render tree: an element exists
//! for the observer, the registry and reveal playback exactly while it is
//! mounted here. Identifiers are never reused, so a remounted section gets a
//! fresh identity and a fresh reveal lifetime.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use reveal_core::ElementBounds;

/// Unique identifier for a watched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Generate a new unique element ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

/// The set of currently mounted elements and their page geometry.
#[derive(Debug, Default)]
pub struct ElementStore {
    elements: HashMap<ElementId, ElementBounds>,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a new element with the given bounds, returning its identity.
    pub fn insert(&mut self, bounds: ElementBounds) -> ElementId {
        let id = ElementId::new();
        self.elements.insert(id, bounds);
        id
    }

    /// Unmount an element. Returns its last bounds, or `None` if it was not
    /// mounted.
    pub fn remove(&mut self, id: ElementId) -> Option<ElementBounds> {
        self.elements.remove(&id)
    }

    /// Current bounds of a mounted element.
    pub fn bounds(&self, id: ElementId) -> Option<ElementBounds> {
        self.elements.get(&id).copied()
    }

    /// Update the bounds of a mounted element (layout change).
    /// Returns `false` if the element is not mounted.
    pub fn set_bounds(&mut self, id: ElementId, bounds: ElementBounds) -> bool {
        match self.elements.get_mut(&id) {
            Some(entry) => {
                *entry = bounds;
                true
            }
            None => false,
        }
    }

    /// Check whether an element is currently mounted.
    pub fn is_mounted(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Number of mounted elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if no elements are mounted.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
