//! Diagnostic overlays drawn on top of an app's frame.
//!
//! Overlays draw through the same [`GraphicsContext`] as the app, right before
//! the frame is published, and own whatever GPU resources they create.

mod fps;
mod segments;

use crate::coords::SurfaceSize;
use crate::gfx::GraphicsContext;

pub use fps::FpsOverlay;
pub use segments::{DigitStyle, PixelRect, SegmentLayout};

pub trait Overlay {
    /// Draws the overlay for a surface of `surface` pixels.
    fn draw<G: GraphicsContext>(&mut self, gfx: &mut G, surface: SurfaceSize);

    /// Releases GPU resources. The overlay may draw again afterwards.
    fn release<G: GraphicsContext>(&mut self, gfx: &mut G);
}

/// No overlay.
impl Overlay for () {
    fn draw<G: GraphicsContext>(&mut self, _gfx: &mut G, _surface: SurfaceSize) {}

    fn release<G: GraphicsContext>(&mut self, _gfx: &mut G) {}
}
