use prism_engine::core::{App, FrameScheduler};
use prism_engine::event::{Event, Lifecycle};
use prism_engine::gfx::{
    AttribFormat, AttribLocation, BufferId, GraphicsContext, ProgramId, UniformLocation,
};
use prism_engine::overlay::Overlay;

use crate::config::{ColorMode, SceneConfig};
use crate::geometry::{self, COLOR_OFFSET, STRIDE, VERTEX_COUNT};
use crate::program::triangle_program;
use crate::state::RenderState;

/// Handles created on the visible transition.
#[derive(Debug)]
struct Resources {
    program: ProgramId,
    buffer: BufferId,
    position: AttribLocation,
    /// Absent in uniform-color mode.
    color: Option<AttribLocation>,
    offset: UniformLocation,
    aspect: UniformLocation,
    scale: UniformLocation,
    tint: Option<UniformLocation>,
}

/// Render loop controller for the draggable, scalable triangle.
///
/// Owns the [`RenderState`] and the GPU resources for one visible period.
/// Paints re-arm themselves through the [`FrameScheduler`], so once the
/// surface is visible the triangle is redrawn every presented frame.
pub struct TriangleController<O> {
    scene: SceneConfig,
    state: RenderState,
    resources: Option<Resources>,
    overlay: O,
}

impl<O: Overlay> TriangleController<O> {
    pub fn new(scene: SceneConfig, overlay: O) -> Self {
        Self {
            scene,
            state: RenderState::new(),
            resources: None,
            overlay,
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn has_context(&self) -> bool {
        self.resources.is_some()
    }

    fn start<G, S>(&mut self, gfx: &mut G, scheduler: &mut S)
    where
        G: GraphicsContext,
        S: FrameScheduler,
    {
        if self.resources.is_some() {
            self.stop(gfx);
        }

        self.state.reset_scale();
        self.resources = create_resources(gfx, self.scene.color_mode);

        // The first tick is requested even when setup failed; it is skipped.
        scheduler.request_frame();
    }

    fn stop<G: GraphicsContext>(&mut self, gfx: &mut G) {
        let Some(res) = self.resources.take() else { return };

        gfx.delete_program(res.program);
        gfx.delete_buffer(res.buffer);
        self.overlay.release(gfx);
        log::debug!("triangle resources released");
    }

    fn paint<G, S>(&mut self, external: bool, gfx: &mut G, scheduler: &mut S)
    where
        G: GraphicsContext,
        S: FrameScheduler,
    {
        // System-sent ticks would double the self-driven frame rate.
        if external {
            return;
        }
        let Some(res) = self.resources.as_ref() else { return };

        draw(gfx, res, &self.scene, &self.state);
        self.overlay.draw(gfx, self.state.surface());

        gfx.publish();
        scheduler.request_frame();
    }
}

impl<O: Overlay> App for TriangleController<O> {
    fn on_event<G, S>(&mut self, event: Event, gfx: &mut G, scheduler: &mut S)
    where
        G: GraphicsContext,
        S: FrameScheduler,
    {
        match event {
            Event::Lifecycle(Lifecycle::Visible) => self.start(gfx, scheduler),
            Event::Lifecycle(Lifecycle::Invisible) => self.stop(gfx),
            Event::Resize(size) => {
                log::debug!("resize {}x{}", size.width, size.height);
                self.state.resize(size);
            }
            Event::Paint { external } => self.paint(external, gfx, scheduler),
            Event::Pointer(pointer) => self.state.apply_pointer(pointer),
            Event::Key(key) => {
                if self.state.apply_key(key, self.scene.scale_step) {
                    log::trace!("scale {}", self.state.scale());
                }
            }
        }
    }
}

fn create_resources<G: GraphicsContext>(gfx: &mut G, mode: ColorMode) -> Option<Resources> {
    let source = triangle_program(mode);
    let program = match gfx.create_program(source) {
        Ok(p) => p,
        Err(e) => {
            log::error!("error creating triangle program: {e}");
            return None;
        }
    };

    let lookup = (
        gfx.attrib_location(program, "position"),
        gfx.uniform_location(program, "offset"),
        gfx.uniform_location(program, "aspect"),
        gfx.uniform_location(program, "scale"),
    );
    let (Some(position), Some(offset), Some(aspect), Some(scale)) = lookup else {
        log::error!("program '{}' is missing a triangle input", source.label);
        gfx.delete_program(program);
        return None;
    };

    let buffer = gfx.create_buffer("prism triangle", geometry::triangle_bytes());

    Some(Resources {
        program,
        buffer,
        position,
        color: gfx.attrib_location(program, "color"),
        offset,
        aspect,
        scale,
        tint: gfx.uniform_location(program, "color"),
    })
}

fn draw<G: GraphicsContext>(gfx: &mut G, res: &Resources, scene: &SceneConfig, state: &RenderState) {
    gfx.clear(scene.background);
    gfx.use_program(res.program);

    let offset = state.normalized_offset();
    gfx.uniform2f(res.offset, offset.x, offset.y);
    gfx.uniform1f(res.aspect, state.aspect());
    gfx.uniform1f(res.scale, state.scale());
    if let (ColorMode::Uniform(c), Some(tint)) = (scene.color_mode, res.tint) {
        gfx.uniform4f(tint, c.r, c.g, c.b, c.a);
    }

    gfx.bind_buffer(res.buffer);
    gfx.enable_vertex_attrib(res.position);
    gfx.vertex_attrib_pointer(res.position, AttribFormat::Float32x3, STRIDE, 0);
    if let Some(color) = res.color {
        gfx.enable_vertex_attrib(color);
        gfx.vertex_attrib_pointer(color, AttribFormat::Float32x4, STRIDE, COLOR_OFFSET);
    }

    gfx.draw_triangles(0, VERTEX_COUNT);

    gfx.disable_vertex_attrib(res.position);
    if let Some(color) = res.color {
        gfx.disable_vertex_attrib(color);
    }
}
