//! Coordinate types shared by the runtime, overlays and applications.
//!
//! Canonical CPU space:
//! - Physical surface pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Shaders convert to clip space from normalized (0..1) surface coordinates.

mod size;
mod vec2;

pub use size::SurfaceSize;
pub use vec2::Vec2;
