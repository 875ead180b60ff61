//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, translates platform events into
//! [`Event`](crate::event::Event)s and hands them to the application.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
