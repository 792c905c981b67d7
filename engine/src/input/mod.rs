//! Input Module
//!
//! Platform-agnostic pointer input for the sandbox and labs.
//! Window events are translated once into [`PointerEvent`]s; everything
//! downstream (picking, dragging, selection) only sees these.
//!
//! # Example
//!
//! ```rust,ignore
//! use physics_lab_engine::input::{MouseButton, PointerEvent, PointerTracker};
//!
//! let mut tracker = PointerTracker::new();
//! tracker.moved(120.0, 80.0);
//! let down = tracker.pressed(MouseButton::Left);
//! assert!(matches!(down, PointerEvent::Down { .. }));
//! ```

pub mod mouse;

pub use mouse::{ButtonState, MouseButton, PointerEvent, PointerTracker, Position};
