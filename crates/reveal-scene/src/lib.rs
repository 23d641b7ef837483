//! Scroll-triggered reveal coordination for the reveal engine.
//!
//! This crate provides:
//! - **Element Store**: identity and page geometry for watched elements
//! - **Visibility Observer**: one-shot (or live) viewport-entry signals
//! - **Reveal Descriptors**: declarative entrance animations with stagger
//! - **Reveal Manager**: plays each descriptor exactly once per element
//! - **Scroll Trigger Registry**: scroll-position-linked triggers with
//!   process-wide teardown
//!
//! # Architecture
//!
//! ```text
//! VisibilityObserver ──(VisibilitySignal)──▶ RevealManager
//!                                              ├── armed one-shot triggers
//!                                              └── active reveals (tweens)
//! ScrollTriggerProvider ──(RegistryHandle)──▶ RevealManager
//!          └── Active Trigger Records (Pending → Played)
//! ```
//!
//! The observer and the registry are two alternative front ends to the same
//! playback path: the observer fires on intersection ratio, the registry on
//! the element's top edge crossing a fixed offset above the viewport bottom.

pub mod element;
pub mod events;
pub mod manager;
pub mod observer;
pub mod registry;
pub mod reveal;

pub use element::{ElementId, ElementStore};
pub use events::{EventQueue, RevealEvent};
pub use manager::RevealManager;
pub use observer::{VisibilityObserver, VisibilitySignal};
pub use registry::{RegistryError, RegistryHandle, ScrollTriggerProvider, TriggerState};
pub use reveal::{ActiveReveal, RevealId, RevealSpec};

pub use reveal_core::{ActiveTween, Easing, ElementBounds, Interpolate, RevealState, TweenState, Viewport};
