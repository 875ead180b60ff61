//! Prism engine crate.
//!
//! Owns the platform loop, the wgpu device and a GL-style graphics context
//! that applications drive one event at a time.

pub mod core;
pub mod coords;
pub mod device;
pub mod event;
pub mod gfx;
pub mod input;
pub mod logging;
pub mod overlay;
pub mod paint;
pub mod time;
pub mod window;
