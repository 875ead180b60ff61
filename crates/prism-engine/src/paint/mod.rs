//! Color model shared between applications and backends.

pub mod color;

pub use color::Color;
