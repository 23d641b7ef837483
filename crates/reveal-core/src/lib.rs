//! Core types for the reveal animation engine.
//!
//! This crate is the leaf dependency of the workspace. It provides:
//! - **Geometry**: viewport and element bounds in page coordinates, plus
//!   the intersection-ratio math the visibility observer is built on
//! - **Easing Functions**: CSS-style timing curves and GSAP-style power curves
//! - **Interpolation**: the `Interpolate` trait for animatable values
//! - **Tween Stepper**: a frame-driven interpolation between two values,
//!   decoupled from any rendering surface
//!
//! Nothing in this crate knows about elements being watched or triggers
//! being registered; that coordination lives in `reveal-scene`.

pub mod easing;
pub mod geometry;
pub mod interpolate;
pub mod state;
pub mod tween;

pub use easing::Easing;
pub use geometry::{ElementBounds, Viewport, intersection_ratio};
pub use interpolate::Interpolate;
pub use state::RevealState;
pub use tween::{ActiveTween, TweenState};
