//! Frame timing for on-screen diagnostics.
//!
//! `FpsCounter::record` is called once per presented frame.

mod fps;

pub use fps::FpsCounter;
