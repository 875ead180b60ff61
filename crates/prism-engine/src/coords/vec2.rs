use core::ops::{Add, Sub};

/// 2D vector in surface pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Component-wise division by a surface size, mapping pixels to `0..1`.
    ///
    /// Zero-sized axes are treated as one pixel wide.
    #[inline]
    pub fn normalized_in(self, size: super::SurfaceSize) -> Vec2 {
        Vec2::new(
            self.x / size.width.max(1) as f32,
            self.y / size.height.max(1) as f32,
        )
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::SurfaceSize;

    #[test]
    fn normalized_in_divides_by_surface_size() {
        let v = Vec2::new(400.0, 100.0).normalized_in(SurfaceSize::new(800, 400));
        assert_eq!(v, Vec2::new(0.5, 0.25));
    }

    #[test]
    fn normalized_in_zero_surface_is_finite() {
        let v = Vec2::new(3.0, 4.0).normalized_in(SurfaceSize::new(0, 0));
        assert_eq!(v, Vec2::new(3.0, 4.0));
    }
}
