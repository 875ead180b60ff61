use std::time::Instant;

use bytemuck::{Pod, Zeroable};

use crate::coords::{SurfaceSize, Vec2};
use crate::gfx::{
    AttribFormat, AttribLocation, AttribSlot, BufferId, GraphicsContext, ProgramId,
    ProgramSource, UniformLocation, UniformSlot,
};
use crate::paint::Color;
use crate::time::FpsCounter;

use super::{DigitStyle, Overlay, PixelRect, SegmentLayout};

/// Highest value the counter displays.
const MAX_DISPLAYED: u32 = 999;

const SOURCE: ProgramSource<'static> = ProgramSource {
    label: "prism fps overlay",
    wgsl: include_str!("shaders/fps.wgsl"),
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
    attributes: &[AttribSlot { name: "corner", location: 0 }],
    uniforms: &[
        UniformSlot { name: "rect", offset: 0 },
        UniformSlot { name: "color", offset: 16 },
    ],
    uniform_size: 32,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Corner {
    pos: [f32; 2],
}

/// Unit quad as a triangle list.
const QUAD: [Corner; 6] = [
    Corner { pos: [0.0, 0.0] },
    Corner { pos: [1.0, 0.0] },
    Corner { pos: [1.0, 1.0] },
    Corner { pos: [0.0, 0.0] },
    Corner { pos: [1.0, 1.0] },
    Corner { pos: [0.0, 1.0] },
];

struct Resources {
    program: ProgramId,
    quad: BufferId,
    corner: AttribLocation,
    rect: UniformLocation,
    color: UniformLocation,
}

/// Frames-per-second counter drawn as seven-segment digits in the top-left
/// corner.
///
/// GPU resources are created on the first draw. If the program cannot be
/// built the failure is logged once and the overlay stays dark until
/// [`release`](Overlay::release).
pub struct FpsOverlay {
    style: DigitStyle,
    margin: f32,
    panel_color: Color,
    digit_color: Color,

    resources: Option<Resources>,
    disabled: bool,

    counter: FpsCounter,
}

impl Default for FpsOverlay {
    fn default() -> Self {
        Self {
            style: DigitStyle::default(),
            margin: 8.0,
            panel_color: Color::from_straight(1.0, 1.0, 1.0, 0.85),
            digit_color: Color::BLACK,
            resources: None,
            disabled: false,
            counter: FpsCounter::new(),
        }
    }
}

impl FpsOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_resources<G: GraphicsContext>(&mut self, gfx: &mut G) -> Option<&Resources> {
        if self.resources.is_none() && !self.disabled {
            match create_resources(gfx) {
                Some(res) => self.resources = Some(res),
                None => self.disabled = true,
            }
        }
        self.resources.as_ref()
    }
}

fn create_resources<G: GraphicsContext>(gfx: &mut G) -> Option<Resources> {
    let program = match gfx.create_program(&SOURCE) {
        Ok(p) => p,
        Err(e) => {
            log::error!("fps overlay disabled: {e}");
            return None;
        }
    };

    let lookup = (
        gfx.attrib_location(program, "corner"),
        gfx.uniform_location(program, "rect"),
        gfx.uniform_location(program, "color"),
    );
    let (Some(corner), Some(rect), Some(color)) = lookup else {
        log::error!("fps overlay disabled: program interface incomplete");
        gfx.delete_program(program);
        return None;
    };

    let quad = gfx.create_buffer("prism fps quad", bytemuck::cast_slice(&QUAD));

    Some(Resources {
        program,
        quad,
        corner,
        rect,
        color,
    })
}

fn fill<G: GraphicsContext>(gfx: &mut G, res: &Resources, rect: PixelRect, color: Color, surface: SurfaceSize) {
    let [x, y, w, h] = rect.to_clip(surface);
    gfx.uniform4f(res.rect, x, y, w, h);
    gfx.uniform4f(res.color, color.r, color.g, color.b, color.a);
    gfx.draw_triangles(0, QUAD.len() as u32);
}

impl Overlay for FpsOverlay {
    fn draw<G: GraphicsContext>(&mut self, gfx: &mut G, surface: SurfaceSize) {
        let fps = self.counter.record(Instant::now()).min(MAX_DISPLAYED);

        let layout = SegmentLayout::new(fps, Vec2::new(self.margin, self.margin), self.style);
        let (panel_color, digit_color) = (self.panel_color, self.digit_color);

        let Some(res) = self.ensure_resources(gfx) else { return };

        gfx.use_program(res.program);
        gfx.bind_buffer(res.quad);
        gfx.enable_vertex_attrib(res.corner);
        gfx.vertex_attrib_pointer(
            res.corner,
            AttribFormat::Float32x2,
            std::mem::size_of::<Corner>() as u32,
            0,
        );

        fill(gfx, res, layout.panel, panel_color, surface);
        for seg in &layout.segments {
            fill(gfx, res, *seg, digit_color, surface);
        }

        gfx.disable_vertex_attrib(res.corner);
    }

    fn release<G: GraphicsContext>(&mut self, gfx: &mut G) {
        if let Some(res) = self.resources.take() {
            gfx.delete_program(res.program);
            gfx.delete_buffer(res.quad);
        }
        self.disabled = false;
        self.counter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{Call, RecordingGraphics};

    const SURFACE: SurfaceSize = SurfaceSize::new(800, 600);

    #[test]
    fn first_draw_creates_resources_once() {
        let mut gfx = RecordingGraphics::new();
        let mut overlay = FpsOverlay::new();

        overlay.draw(&mut gfx, SURFACE);
        overlay.draw(&mut gfx, SURFACE);

        let created = gfx
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateProgram { .. }))
            .count();
        assert_eq!(created, 1);
        assert_eq!(gfx.live_programs(), 1);
        assert_eq!(gfx.live_buffers(), 1);
    }

    #[test]
    fn draws_panel_plus_lit_segments() {
        let mut gfx = RecordingGraphics::new();
        let mut overlay = FpsOverlay::new();

        // First frame counts itself: the display reads "1".
        overlay.draw(&mut gfx, SURFACE);

        assert_eq!(gfx.rejected().count(), 0);
        assert_eq!(gfx.draw_count(), 1 + 2);
        assert!(gfx.draws().all(|d| d.count == 6 && d.layout.stride == 8));
    }

    #[test]
    fn leaves_attribute_disabled() {
        let mut gfx = RecordingGraphics::new();
        let mut overlay = FpsOverlay::new();
        overlay.draw(&mut gfx, SURFACE);

        assert!(matches!(gfx.calls().last(), Some(Call::DisableAttrib(AttribLocation(0)))));
    }

    #[test]
    fn release_deletes_resources_and_allows_redraw() {
        let mut gfx = RecordingGraphics::new();
        let mut overlay = FpsOverlay::new();

        overlay.draw(&mut gfx, SURFACE);
        overlay.release(&mut gfx);
        assert_eq!(gfx.live_programs(), 0);
        assert_eq!(gfx.live_buffers(), 0);

        overlay.draw(&mut gfx, SURFACE);
        assert_eq!(gfx.live_programs(), 1);
    }

    #[test]
    fn program_failure_disables_overlay_quietly() {
        let mut gfx = RecordingGraphics::new();
        gfx.fail_program(SOURCE.label);
        let mut overlay = FpsOverlay::new();

        overlay.draw(&mut gfx, SURFACE);
        overlay.draw(&mut gfx, SURFACE);

        let attempts = gfx
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateProgram { .. }))
            .count();
        assert_eq!(attempts, 1);
        assert_eq!(gfx.draw_count(), 0);
        assert_eq!(gfx.live_buffers(), 0);
    }

    #[test]
    fn release_without_draw_is_a_no_op() {
        let mut gfx = RecordingGraphics::new();
        FpsOverlay::new().release(&mut gfx);
        assert!(gfx.calls().is_empty());
    }
}
