use prism_engine::coords::{SurfaceSize, Vec2};
use prism_engine::event::{KeyEvent, PointerEvent, PointerPhase};

/// Everything the triangle's placement depends on.
///
/// Positions are surface pixels, origin top-left, +Y down.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    offset: Vec2,
    scale: f32,
    aspect: f32,
    dragging: bool,
    drag_anchor: Vec2,
    surface: SurfaceSize,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            offset: Vec2::zero(),
            scale: 1.0,
            aspect: 1.0,
            dragging: false,
            drag_anchor: Vec2::zero(),
            surface: SurfaceSize::default(),
        }
    }
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn drag_anchor(&self) -> Vec2 {
        self.drag_anchor
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    /// Offset as a fraction of the surface, the form the shader expects.
    pub fn normalized_offset(&self) -> Vec2 {
        self.offset.normalized_in(self.surface)
    }

    pub fn reset_scale(&mut self) {
        self.scale = 1.0;
    }

    /// Records the new surface size, recomputes the aspect ratio and moves the
    /// triangle back to the center.
    ///
    /// A zero-area size is recorded but leaves aspect and offset alone.
    pub fn resize(&mut self, size: SurfaceSize) {
        self.surface = size;
        let Some(aspect) = size.aspect() else { return };
        self.aspect = aspect;
        self.offset = size.center();
    }

    pub fn apply_pointer(&mut self, event: PointerEvent) {
        match event.phase {
            PointerPhase::Down => {
                self.drag_anchor = self.offset - event.position;
                self.dragging = true;
            }
            PointerPhase::Move => {
                if self.dragging {
                    self.offset = event.position + self.drag_anchor;
                }
            }
            PointerPhase::Up => {
                self.drag_anchor = Vec2::zero();
                self.dragging = false;
            }
        }
    }

    /// Grows on `+`/`=`, shrinks on `-`. Returns whether the scale changed.
    pub fn apply_key(&mut self, key: KeyEvent, step: f32) -> bool {
        if !key.is_down() {
            return false;
        }
        match key.ch {
            Some('+' | '=') => self.scale *= step,
            Some('-') => self.scale /= step,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_engine::event::KeyDirection;

    const STEP: f32 = 1.1;

    fn press(state: &mut RenderState, ch: char) {
        state.apply_key(KeyEvent::press(ch), STEP);
    }

    fn pointer(state: &mut RenderState, phase: PointerPhase, x: f32, y: f32) {
        state.apply_pointer(PointerEvent::new(phase, x, y));
    }

    #[test]
    fn starts_unscaled_and_idle() {
        let s = RenderState::new();
        assert_eq!(s.scale(), 1.0);
        assert_eq!(s.aspect(), 1.0);
        assert_eq!(s.offset(), Vec2::zero());
        assert!(!s.is_dragging());
    }

    #[test]
    fn aspect_is_exactly_height_over_width() {
        for (w, h) in [(800, 400), (1920, 1080), (1, 3), (1080, 2340)] {
            let mut s = RenderState::new();
            s.resize(SurfaceSize::new(w, h));
            assert_eq!(s.aspect(), h as f32 / w as f32);
        }
    }

    #[test]
    fn resize_centers_the_triangle() {
        let mut s = RenderState::new();
        pointer(&mut s, PointerPhase::Down, 0.0, 0.0);
        pointer(&mut s, PointerPhase::Move, 10.0, 10.0);

        s.resize(SurfaceSize::new(801, 401));
        assert_eq!(s.offset(), Vec2::new(400.0, 200.0));
    }

    #[test]
    fn zero_area_resize_only_records_size() {
        let mut s = RenderState::new();
        s.resize(SurfaceSize::new(800, 400));
        s.resize(SurfaceSize::new(0, 400));

        assert_eq!(s.surface(), SurfaceSize::new(0, 400));
        assert_eq!(s.aspect(), 0.5);
        assert_eq!(s.offset(), Vec2::new(400.0, 200.0));
        assert!(s.aspect().is_finite());
    }

    #[test]
    fn drag_preserves_grab_point() {
        let mut s = RenderState::new();
        s.resize(SurfaceSize::new(1000, 1000));
        let start = s.offset();

        pointer(&mut s, PointerPhase::Down, 480.0, 530.0);
        pointer(&mut s, PointerPhase::Move, 480.0 + 25.0, 530.0 - 40.0);

        assert_eq!(s.offset(), Vec2::new(start.x + 25.0, start.y - 40.0));
    }

    #[test]
    fn move_without_down_is_ignored() {
        let mut s = RenderState::new();
        s.resize(SurfaceSize::new(800, 400));
        pointer(&mut s, PointerPhase::Move, 10.0, 10.0);
        assert_eq!(s.offset(), Vec2::new(400.0, 200.0));
    }

    #[test]
    fn up_clears_drag_state() {
        let mut s = RenderState::new();
        s.resize(SurfaceSize::new(800, 400));
        pointer(&mut s, PointerPhase::Down, 100.0, 100.0);
        pointer(&mut s, PointerPhase::Up, 120.0, 90.0);

        assert!(!s.is_dragging());
        assert_eq!(s.drag_anchor(), Vec2::zero());

        pointer(&mut s, PointerPhase::Move, 0.0, 0.0);
        assert_eq!(s.offset(), Vec2::new(400.0, 200.0));
    }

    #[test]
    fn drag_scenario_on_800_by_400() {
        let mut s = RenderState::new();
        s.resize(SurfaceSize::new(800, 400));
        assert_eq!(s.aspect(), 0.5);
        assert_eq!(s.offset(), Vec2::new(400.0, 200.0));

        pointer(&mut s, PointerPhase::Down, 400.0, 200.0);
        assert_eq!(s.drag_anchor(), Vec2::zero());

        pointer(&mut s, PointerPhase::Move, 450.0, 220.0);
        assert_eq!(s.offset(), Vec2::new(450.0, 220.0));
        assert_eq!(s.normalized_offset(), Vec2::new(450.0 / 800.0, 220.0 / 400.0));
    }

    #[test]
    fn scale_scenario() {
        let mut s = RenderState::new();
        for _ in 0..3 {
            press(&mut s, '+');
        }
        assert!((s.scale() - 1.331).abs() < 1e-5);

        press(&mut s, '-');
        assert!((s.scale() - 1.21).abs() < 1e-5);
    }

    #[test]
    fn plus_then_minus_n_times_round_trips() {
        for n in [1, 5, 20] {
            let mut s = RenderState::new();
            for _ in 0..n {
                press(&mut s, '=');
            }
            for _ in 0..n {
                press(&mut s, '-');
            }
            assert!((s.scale() - 1.0).abs() < 1e-5, "n = {n}: {}", s.scale());
        }
    }

    #[test]
    fn repeat_scales_release_does_not() {
        let mut s = RenderState::new();
        let repeat = KeyEvent { ch: Some('+'), direction: KeyDirection::Repeat };
        let release = KeyEvent { ch: Some('+'), direction: KeyDirection::Release };

        assert!(s.apply_key(repeat, STEP));
        assert!(!s.apply_key(release, STEP));
        assert_eq!(s.scale(), STEP);
    }

    #[test]
    fn other_keys_leave_scale_alone() {
        let mut s = RenderState::new();
        assert!(!s.apply_key(KeyEvent::press('a'), STEP));
        assert!(!s.apply_key(KeyEvent { ch: None, direction: KeyDirection::Press }, STEP));
        assert_eq!(s.scale(), 1.0);
    }

    #[test]
    fn scale_is_unbounded() {
        let mut s = RenderState::new();
        for _ in 0..200 {
            press(&mut s, '-');
        }
        assert!(s.scale() > 0.0 && s.scale() < 1e-6);
    }
}
