//! Viewport and element geometry in page coordinates.
//!
//! Everything here works in a single one-dimensional page space: `y = 0.0`
//! is the top of the page and values grow downward. The viewport is a
//! window into that space positioned by its scroll offset. The intersection
//! ratio of an element against the viewport is the input to the visibility
//! observer's threshold test.

use serde::{Deserialize, Serialize};

/// The visible window into the page, positioned by scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Scroll offset of the viewport top from the top of the page.
    pub scroll_top: f64,
    /// Height of the viewport.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport at scroll position zero.
    pub fn new(height: f64) -> Self {
        Self {
            scroll_top: 0.0,
            height,
        }
    }

    /// Page coordinate of the viewport's top edge.
    pub fn top(&self) -> f64 {
        self.scroll_top
    }

    /// Page coordinate of the viewport's bottom edge.
    pub fn bottom(&self) -> f64 {
        self.scroll_top + self.height
    }

    /// Scroll the viewport by a delta (positive scrolls down).
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_top += delta;
    }
}

/// Bounding box of an element along the page axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementBounds {
    /// Page coordinate of the element's top edge.
    pub top: f64,
    /// Height of the element's bounding box.
    pub height: f64,
}

impl ElementBounds {
    /// Create bounds from a top coordinate and height.
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Page coordinate of the element's bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Fraction of an element's bounding box currently inside the viewport.
///
/// Returns a value in `[0, 1]`. A zero-height element counts as fully
/// visible when its top edge lies inside the viewport and invisible
/// otherwise.
pub fn intersection_ratio(bounds: ElementBounds, viewport: &Viewport) -> f64 {
    if bounds.height <= 0.0 {
        return if bounds.top >= viewport.top() && bounds.top <= viewport.bottom() {
            1.0
        } else {
            0.0
        };
    }

    let visible_top = bounds.top.max(viewport.top());
    let visible_bottom = bounds.bottom().min(viewport.bottom());
    let visible = (visible_bottom - visible_top).max(0.0);

    (visible / bounds.height).clamp(0.0, 1.0)
}
