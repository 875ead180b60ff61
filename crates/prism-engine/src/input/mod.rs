//! Input translation.
//!
//! The runtime reduces raw platform pointer input (mouse, touch, focus) to
//! [`RawPointer`] values; [`PointerTracker`] turns those into the single-pointer
//! [`PointerEvent`](crate::event::PointerEvent) stream apps receive.

mod tracker;

pub use tracker::{PointerTracker, RawPointer, TouchPhase};
