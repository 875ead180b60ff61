use super::Vec2;

/// Drawable surface size in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Surface center using integer halves.
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new((self.width / 2) as f32, (self.height / 2) as f32)
    }

    /// Height over width, or `None` for a zero-area surface.
    #[inline]
    pub fn aspect(self) -> Option<f32> {
        if self.is_empty() {
            None
        } else {
            Some(self.height as f32 / self.width as f32)
        }
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for SurfaceSize {
    fn from(s: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(s.width, s.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_is_height_over_width() {
        assert_eq!(SurfaceSize::new(800, 400).aspect(), Some(0.5));
        assert_eq!(SurfaceSize::new(1080, 1920).aspect(), Some(1920.0 / 1080.0));
    }

    #[test]
    fn aspect_of_empty_surface_is_none() {
        assert_eq!(SurfaceSize::new(0, 400).aspect(), None);
        assert_eq!(SurfaceSize::new(800, 0).aspect(), None);
    }

    #[test]
    fn center_uses_integer_halves() {
        assert_eq!(SurfaceSize::new(801, 401).center(), Vec2::new(400.0, 200.0));
    }
}
