use crate::coords::Vec2;
use crate::event::{PointerEvent, PointerPhase};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Platform pointer input in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RawPointer {
    CursorMoved { x: f32, y: f32 },
    CursorLeft,
    /// Primary mouse button transition.
    PrimaryButton { pressed: bool },
    Touch { id: u64, phase: TouchPhase, x: f32, y: f32 },
    FocusLost,
}

/// Single-pointer state for one window.
///
/// Mouse and touch share one logical pointer: the first finger down owns it
/// until it lifts, and other fingers are ignored meanwhile.
#[derive(Debug, Default)]
pub struct PointerTracker {
    /// Last cursor position in surface pixels.
    cursor: Option<Vec2>,
    mouse_down: bool,
    active_touch: Option<u64>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_down(&self) -> bool {
        self.mouse_down || self.active_touch.is_some()
    }

    /// Applies raw input, returning the pointer event it produces, if any.
    pub fn apply(&mut self, raw: RawPointer) -> Option<PointerEvent> {
        match raw {
            RawPointer::CursorMoved { x, y } => {
                self.cursor = Some(Vec2::new(x, y));
                self.mouse_down
                    .then(|| PointerEvent::new(PointerPhase::Move, x, y))
            }

            RawPointer::CursorLeft => {
                // Keep the last position while a drag is in progress; the
                // platform keeps delivering moves to a captured pointer.
                if !self.mouse_down {
                    self.cursor = None;
                }
                None
            }

            RawPointer::PrimaryButton { pressed } => {
                if pressed == self.mouse_down || self.active_touch.is_some() {
                    return None;
                }

                if !pressed {
                    self.mouse_down = false;
                    let at = self.cursor.unwrap_or_default();
                    return Some(PointerEvent::new(PointerPhase::Up, at.x, at.y));
                }

                // No position yet: there is nothing to anchor a drag to.
                let at = self.cursor?;
                self.mouse_down = true;
                Some(PointerEvent::new(PointerPhase::Down, at.x, at.y))
            }

            RawPointer::Touch { id, phase, x, y } => match phase {
                TouchPhase::Started => {
                    if self.active_touch.is_some() || self.mouse_down {
                        return None;
                    }
                    self.active_touch = Some(id);
                    Some(PointerEvent::new(PointerPhase::Down, x, y))
                }
                TouchPhase::Moved => (self.active_touch == Some(id))
                    .then(|| PointerEvent::new(PointerPhase::Move, x, y)),
                TouchPhase::Ended | TouchPhase::Cancelled => {
                    if self.active_touch != Some(id) {
                        return None;
                    }
                    self.active_touch = None;
                    Some(PointerEvent::new(PointerPhase::Up, x, y))
                }
            },

            RawPointer::FocusLost => {
                // Avoids a stuck drag when focus changes mid-press.
                if !self.mouse_down {
                    return None;
                }
                self.mouse_down = false;
                let at = self.cursor.unwrap_or_default();
                Some(PointerEvent::new(PointerPhase::Up, at.x, at.y))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(phase: PointerPhase, x: f32, y: f32) -> Option<PointerEvent> {
        Some(PointerEvent::new(phase, x, y))
    }

    #[test]
    fn mouse_drag_produces_down_move_up() {
        let mut t = PointerTracker::new();
        assert_eq!(t.apply(RawPointer::CursorMoved { x: 10.0, y: 20.0 }), None);
        assert_eq!(t.apply(RawPointer::PrimaryButton { pressed: true }), ev(PointerPhase::Down, 10.0, 20.0));
        assert_eq!(t.apply(RawPointer::CursorMoved { x: 15.0, y: 25.0 }), ev(PointerPhase::Move, 15.0, 25.0));
        assert_eq!(t.apply(RawPointer::PrimaryButton { pressed: false }), ev(PointerPhase::Up, 15.0, 25.0));
        assert!(!t.is_down());
    }

    #[test]
    fn hover_without_button_is_silent() {
        let mut t = PointerTracker::new();
        assert_eq!(t.apply(RawPointer::CursorMoved { x: 1.0, y: 1.0 }), None);
        assert_eq!(t.apply(RawPointer::PrimaryButton { pressed: false }), None);
    }

    #[test]
    fn second_finger_is_ignored() {
        let mut t = PointerTracker::new();
        let touch = |id, phase, x| RawPointer::Touch { id, phase, x, y: 0.0 };

        assert_eq!(t.apply(touch(1, TouchPhase::Started, 5.0)), ev(PointerPhase::Down, 5.0, 0.0));
        assert_eq!(t.apply(touch(2, TouchPhase::Started, 9.0)), None);
        assert_eq!(t.apply(touch(2, TouchPhase::Moved, 9.5)), None);
        assert_eq!(t.apply(touch(1, TouchPhase::Moved, 6.0)), ev(PointerPhase::Move, 6.0, 0.0));
        assert_eq!(t.apply(touch(2, TouchPhase::Ended, 9.5)), None);
        assert_eq!(t.apply(touch(1, TouchPhase::Cancelled, 6.0)), ev(PointerPhase::Up, 6.0, 0.0));
    }

    #[test]
    fn focus_loss_ends_mouse_drag() {
        let mut t = PointerTracker::new();
        t.apply(RawPointer::CursorMoved { x: 3.0, y: 4.0 });
        t.apply(RawPointer::PrimaryButton { pressed: true });
        assert_eq!(t.apply(RawPointer::FocusLost), ev(PointerPhase::Up, 3.0, 4.0));
        assert_eq!(t.apply(RawPointer::FocusLost), None);
    }

    #[test]
    fn press_before_any_cursor_position_is_ignored() {
        let mut t = PointerTracker::new();
        assert_eq!(t.apply(RawPointer::PrimaryButton { pressed: true }), None);
        assert!(!t.is_down());

        // A later move does not drag, and the next press starts from the cursor.
        assert_eq!(t.apply(RawPointer::CursorMoved { x: 300.0, y: 200.0 }), None);
        assert_eq!(t.apply(RawPointer::PrimaryButton { pressed: true }), ev(PointerPhase::Down, 300.0, 200.0));
    }

    #[test]
    fn press_after_cursor_left_is_ignored() {
        let mut t = PointerTracker::new();
        t.apply(RawPointer::CursorMoved { x: 5.0, y: 5.0 });
        t.apply(RawPointer::CursorLeft);
        assert_eq!(t.apply(RawPointer::PrimaryButton { pressed: true }), None);
    }

    #[test]
    fn cursor_leaving_during_drag_keeps_position() {
        let mut t = PointerTracker::new();
        t.apply(RawPointer::CursorMoved { x: 7.0, y: 8.0 });
        t.apply(RawPointer::PrimaryButton { pressed: true });
        t.apply(RawPointer::CursorLeft);
        assert_eq!(t.apply(RawPointer::PrimaryButton { pressed: false }), ev(PointerPhase::Up, 7.0, 8.0));
    }
}
