use crate::coords::{SurfaceSize, Vec2};

/// Lit segments per decimal digit; bit 0 is segment `a`, bit 6 is `g`.
const DIGIT_SEGMENTS: [u8; 10] = [
    0b011_1111, // 0
    0b000_0110, // 1
    0b101_1011, // 2
    0b100_1111, // 3
    0b110_0110, // 4
    0b110_1101, // 5
    0b111_1101, // 6
    0b000_0111, // 7
    0b111_1111, // 8
    0b110_1111, // 9
];

/// Axis-aligned rectangle in surface pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Clip-space origin and extent `[x, y, w, h]`; `h` is negative because
    /// clip space grows upward.
    pub fn to_clip(self, surface: SurfaceSize) -> [f32; 4] {
        let sw = surface.width.max(1) as f32;
        let sh = surface.height.max(1) as f32;
        [
            2.0 * self.x / sw - 1.0,
            1.0 - 2.0 * self.y / sh,
            2.0 * self.w / sw,
            -2.0 * self.h / sh,
        ]
    }
}

/// Seven-segment digit geometry in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DigitStyle {
    pub width: f32,
    pub height: f32,
    pub stroke: f32,
    /// Horizontal space between digits.
    pub gap: f32,
    /// Panel padding around the digits.
    pub padding: f32,
}

impl Default for DigitStyle {
    fn default() -> Self {
        Self {
            width: 12.0,
            height: 22.0,
            stroke: 3.0,
            gap: 4.0,
            padding: 4.0,
        }
    }
}

/// Panel and lit segments for one number.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentLayout {
    pub panel: PixelRect,
    pub segments: Vec<PixelRect>,
}

/// Decimal digits of `value`, most significant first.
pub fn decimal_digits(mut value: u32) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        out.push((value % 10) as u8);
        value /= 10;
        if value == 0 {
            break;
        }
    }
    out.reverse();
    out
}

impl SegmentLayout {
    /// Lays out `value` with the panel's top-left corner at `origin`.
    pub fn new(value: u32, origin: Vec2, style: DigitStyle) -> Self {
        let digits = decimal_digits(value);
        let n = digits.len() as f32;

        let panel = PixelRect::new(
            origin.x,
            origin.y,
            n * style.width + (n - 1.0) * style.gap + 2.0 * style.padding,
            style.height + 2.0 * style.padding,
        );

        let mut segments = Vec::new();
        for (i, &d) in digits.iter().enumerate() {
            let at = Vec2::new(
                origin.x + style.padding + i as f32 * (style.width + style.gap),
                origin.y + style.padding,
            );
            segments.extend(digit_segments(d, at, style));
        }

        Self { panel, segments }
    }
}

fn digit_segments(digit: u8, at: Vec2, style: DigitStyle) -> impl Iterator<Item = PixelRect> {
    let DigitStyle { width: w, height: h, stroke: t, .. } = style;
    let half = h / 2.0;

    let boxes = [
        PixelRect::new(0.0, 0.0, w, t),              // a: top
        PixelRect::new(w - t, 0.0, t, half),         // b: upper right
        PixelRect::new(w - t, half, t, half),        // c: lower right
        PixelRect::new(0.0, h - t, w, t),            // d: bottom
        PixelRect::new(0.0, half, t, half),          // e: lower left
        PixelRect::new(0.0, 0.0, t, half),           // f: upper left
        PixelRect::new(0.0, half - t / 2.0, w, t),   // g: middle
    ];

    let mask = DIGIT_SEGMENTS[(digit % 10) as usize];
    boxes
        .into_iter()
        .enumerate()
        .filter(move |(bit, _)| mask & (1u8 << *bit) != 0)
        .map(move |(_, r)| PixelRect::new(at.x + r.x, at.y + r.y, r.w, r.h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_digits_most_significant_first() {
        assert_eq!(decimal_digits(0), vec![0]);
        assert_eq!(decimal_digits(7), vec![7]);
        assert_eq!(decimal_digits(604), vec![6, 0, 4]);
    }

    #[test]
    fn lit_segment_counts() {
        let style = DigitStyle::default();
        let count = |v| SegmentLayout::new(v, Vec2::zero(), style).segments.len();
        assert_eq!(count(8), 7);
        assert_eq!(count(1), 2);
        assert_eq!(count(60), 6 + 6);
    }

    #[test]
    fn panel_wraps_all_digits() {
        let style = DigitStyle::default();
        let layout = SegmentLayout::new(60, Vec2::new(8.0, 8.0), style);
        // 2 digits * 12 + 1 gap * 4 + 2 * 4 padding.
        assert_eq!(layout.panel, PixelRect::new(8.0, 8.0, 36.0, 30.0));
        for s in &layout.segments {
            assert!(s.x >= layout.panel.x && s.x + s.w <= layout.panel.x + layout.panel.w);
            assert!(s.y >= layout.panel.y && s.y + s.h <= layout.panel.y + layout.panel.h);
        }
    }

    #[test]
    fn to_clip_maps_corners() {
        let surface = SurfaceSize::new(200, 100);
        assert_eq!(PixelRect::new(0.0, 0.0, 200.0, 100.0).to_clip(surface), [-1.0, 1.0, 2.0, -2.0]);
        assert_eq!(PixelRect::new(100.0, 50.0, 50.0, 25.0).to_clip(surface), [0.0, 0.0, 0.5, -0.5]);
    }
}
