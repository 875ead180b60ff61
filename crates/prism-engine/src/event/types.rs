use crate::coords::{SurfaceSize, Vec2};

/// Surface visibility transition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Lifecycle {
    /// The surface became visible; a graphics context is available.
    Visible,
    /// The surface stopped being visible; GPU resources should be released.
    Invisible,
}

/// Pointer (mouse or touch) phase.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Pointer event in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Vec2,
}

impl PointerEvent {
    #[inline]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            position: Vec2::new(x, y),
        }
    }
}

/// Key transition.
///
/// `Repeat` is an auto-repeat of a held key; applications usually treat it
/// like `Press`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyDirection {
    Press,
    Repeat,
    Release,
}

/// Keyboard event carrying the logical character, when the key produces one.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyEvent {
    pub ch: Option<char>,
    pub direction: KeyDirection,
}

impl KeyEvent {
    #[inline]
    pub fn press(ch: char) -> Self {
        Self {
            ch: Some(ch),
            direction: KeyDirection::Press,
        }
    }

    /// True for presses and auto-repeats.
    #[inline]
    pub fn is_down(&self) -> bool {
        matches!(self.direction, KeyDirection::Press | KeyDirection::Repeat)
    }
}

/// Events delivered to an [`App`](crate::core::App).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Event {
    Lifecycle(Lifecycle),

    /// Drawable size changed, in physical pixels.
    Resize(SurfaceSize),

    /// One frame should be rendered and presented.
    ///
    /// `external` is true when the platform asked for the frame rather than
    /// the app through [`FrameScheduler::request_frame`](crate::core::FrameScheduler).
    Paint { external: bool },

    Pointer(PointerEvent),

    Key(KeyEvent),
}
