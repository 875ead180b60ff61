//! Event model delivered to applications.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The window runtime translates platform events into these variants and
//! hands them to the app strictly one at a time.

mod types;

pub use types::{Event, KeyDirection, KeyEvent, Lifecycle, PointerEvent, PointerPhase};
