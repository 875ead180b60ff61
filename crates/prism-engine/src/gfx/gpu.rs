use std::collections::HashMap;
use std::num::NonZeroU64;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::coords::SurfaceSize;
use crate::device::{Gpu, SurfaceRecovery};
use crate::paint::Color;

use super::{
    AttribFormat, AttribLocation, BindingState, BufferId, GraphicsContext, GraphicsError,
    ProgramId, ProgramInterface, ProgramSource, UniformLocation, VertexLayout,
};

/// Smallest uniform ring allocation, in bytes.
const MIN_RING_CAPACITY: u64 = 4096;

/// wgpu implementation of [`GraphicsContext`].
///
/// GL-style calls are recorded between publishes and replayed as a single
/// render pass when the frame is published:
/// - programs compile to shader modules; pipelines are built lazily per
///   vertex layout the first time a layout is drawn
/// - every draw snapshots its program's uniform block into a per-frame ring
///   addressed with dynamic offsets
/// - `clear` becomes the pass load op
pub struct GpuGraphics<'w> {
    gpu: Gpu<'w>,

    programs: HashMap<ProgramId, GpuProgram>,
    buffers: HashMap<BufferId, wgpu::Buffer>,
    bindings: BindingState,
    next_id: u32,

    frame: FrameRecording,
    ring: UniformRing,
    uniform_align: u32,

    fatal: bool,
}

struct GpuProgram {
    label: String,
    interface: ProgramInterface,
    module: wgpu::ShaderModule,
    vertex_entry: String,
    fragment_entry: String,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    pipeline_layout: wgpu::PipelineLayout,

    /// `None` marks a layout whose pipeline failed to build; it is not retried.
    pipelines: HashMap<VertexLayout, Option<wgpu::RenderPipeline>>,

    /// Bind group over the uniform ring, tagged with the ring generation.
    bind_group: Option<(u64, wgpu::BindGroup)>,
}

#[derive(Default)]
struct FrameRecording {
    clear: Option<Color>,
    draws: Vec<RecordedDraw>,
    uniform_bytes: Vec<u8>,
}

impl FrameRecording {
    /// Appends a uniform snapshot at the next aligned offset.
    fn push_uniforms(&mut self, bytes: &[u8], align: u32) -> u32 {
        let offset = (self.uniform_bytes.len() as u32).next_multiple_of(align);
        self.uniform_bytes.resize(offset as usize, 0);
        self.uniform_bytes.extend_from_slice(bytes);
        offset
    }
}

struct RecordedDraw {
    program: ProgramId,
    buffer: BufferId,
    layout: VertexLayout,
    uniform_offset: Option<u32>,
    first: u32,
    count: u32,
}

#[derive(Default)]
struct UniformRing {
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
    generation: u64,
}

impl<'w> GpuGraphics<'w> {
    pub fn new(gpu: Gpu<'w>) -> Self {
        let uniform_align = gpu.device().limits().min_uniform_buffer_offset_alignment;
        Self {
            gpu,
            programs: HashMap::new(),
            buffers: HashMap::new(),
            bindings: BindingState::new(),
            next_id: 0,
            frame: FrameRecording::default(),
            ring: UniformRing::default(),
            uniform_align,
            fatal: false,
        }
    }

    /// Drawable size in physical pixels.
    pub fn size(&self) -> SurfaceSize {
        self.gpu.size().into()
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    /// True once the surface reported an unrecoverable error.
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    fn next_raw(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn upload_uniforms(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        let needed = bytes.len() as u64;
        if self.ring.buffer.is_none() || needed > self.ring.capacity {
            let capacity = needed.next_power_of_two().max(MIN_RING_CAPACITY);
            self.ring.buffer = Some(self.gpu.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some("prism uniform ring"),
                size: capacity,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.ring.capacity = capacity;
            self.ring.generation += 1;
        }

        let Some(ring) = self.ring.buffer.as_ref() else { return };
        self.gpu.queue().write_buffer(ring, 0, bytes);
    }

    fn ensure_bind_groups(&mut self, draws: &[RecordedDraw]) {
        let Some(ring) = self.ring.buffer.as_ref() else { return };
        let generation = self.ring.generation;

        for draw in draws.iter().filter(|d| d.uniform_offset.is_some()) {
            let Some(prog) = self.programs.get_mut(&draw.program) else { continue };
            if matches!(prog.bind_group, Some((g, _)) if g == generation) {
                continue;
            }
            let Some(bgl) = prog.bind_group_layout.as_ref() else { continue };

            let bind_group = self.gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} bind group", prog.label)),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: ring,
                        offset: 0,
                        size: NonZeroU64::new(prog.interface.uniform_size() as u64),
                    }),
                }],
            });
            prog.bind_group = Some((generation, bind_group));
        }
    }
}

impl GraphicsContext for GpuGraphics<'_> {
    fn create_program(&mut self, source: &ProgramSource<'_>) -> Result<ProgramId, GraphicsError> {
        let device = self.gpu.device();
        let interface = ProgramInterface::from_source(source);

        let module = compile_module(device, source.label, source.wgsl)?;

        let bind_group_layout = NonZeroU64::new(interface.uniform_size() as u64).map(|size| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{} bgl", source.label)),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: Some(size),
                    },
                    count: None,
                }],
            })
        });

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> = bind_group_layout.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} pipeline layout", source.label)),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let id = ProgramId::from_raw(self.next_raw());
        self.bindings.register_program(id, interface.uniform_size());
        self.programs.insert(
            id,
            GpuProgram {
                label: source.label.to_string(),
                interface,
                module,
                vertex_entry: source.vertex_entry.to_string(),
                fragment_entry: source.fragment_entry.to_string(),
                bind_group_layout,
                pipeline_layout,
                pipelines: HashMap::new(),
                bind_group: None,
            },
        );

        log::debug!("created program '{}' as {}", source.label, id.raw());
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.bindings.forget_program(program);
        if self.programs.remove(&program).is_none() {
            log::warn!("delete of unknown program {}", program.raw());
        }
    }

    fn create_buffer(&mut self, label: &str, contents: &[u8]) -> BufferId {
        let buffer = self
            .gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            });

        let id = BufferId::from_raw(self.next_raw());
        self.bindings.register_buffer(id);
        self.buffers.insert(id, buffer);
        id
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.bindings.forget_buffer(buffer);
        match self.buffers.remove(&buffer) {
            Some(b) => b.destroy(),
            None => log::warn!("delete of unknown buffer {}", buffer.raw()),
        }
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation> {
        self.programs.get(&program)?.interface.attrib(name)
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.programs.get(&program)?.interface.uniform(name)
    }

    fn clear(&mut self, color: Color) {
        // Draws recorded before the clear would be overwritten by it.
        self.frame.draws.clear();
        self.frame.clear = Some(color);
    }

    fn use_program(&mut self, program: ProgramId) {
        if let Err(e) = self.bindings.use_program(program) {
            log::warn!("use_program ignored: {e}");
        }
    }

    fn uniform1f(&mut self, location: UniformLocation, v: f32) {
        if let Err(e) = self.bindings.write_uniform(location, &[v]) {
            log::warn!("uniform write ignored: {e}");
        }
    }

    fn uniform2f(&mut self, location: UniformLocation, x: f32, y: f32) {
        if let Err(e) = self.bindings.write_uniform(location, &[x, y]) {
            log::warn!("uniform write ignored: {e}");
        }
    }

    fn uniform4f(&mut self, location: UniformLocation, x: f32, y: f32, z: f32, w: f32) {
        if let Err(e) = self.bindings.write_uniform(location, &[x, y, z, w]) {
            log::warn!("uniform write ignored: {e}");
        }
    }

    fn bind_buffer(&mut self, buffer: BufferId) {
        if let Err(e) = self.bindings.bind_buffer(buffer) {
            log::warn!("bind_buffer ignored: {e}");
        }
    }

    fn enable_vertex_attrib(&mut self, location: AttribLocation) {
        self.bindings.enable(location);
    }

    fn disable_vertex_attrib(&mut self, location: AttribLocation) {
        self.bindings.disable(location);
    }

    fn vertex_attrib_pointer(
        &mut self,
        location: AttribLocation,
        format: AttribFormat,
        stride: u32,
        offset: u32,
    ) {
        self.bindings.pointer(location, format, stride, offset);
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        let call = match self.bindings.draw_call(first, count) {
            Ok(call) => call,
            Err(e) => {
                log::warn!("draw ignored: {e}");
                return;
            }
        };

        let format = self.gpu.surface_format();
        let Some(prog) = self.programs.get_mut(&call.program) else { return };
        if !prog.pipelines.contains_key(&call.layout) {
            let pipeline = build_pipeline(self.gpu.device(), format, prog, &call.layout);
            prog.pipelines.insert(call.layout.clone(), pipeline);
        }

        let uniform_offset = (!call.uniforms.is_empty())
            .then(|| self.frame.push_uniforms(&call.uniforms, self.uniform_align));

        self.frame.draws.push(RecordedDraw {
            program: call.program,
            buffer: call.buffer,
            layout: call.layout,
            uniform_offset,
            first: call.first,
            count: call.count,
        });
    }

    fn publish(&mut self) {
        let recording = std::mem::take(&mut self.frame);

        if self.size().is_empty() {
            return;
        }

        self.upload_uniforms(&recording.uniform_bytes);
        self.ensure_bind_groups(&recording.draws);

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                match self.gpu.recover(err) {
                    SurfaceRecovery::Fatal => {
                        log::error!("surface lost beyond recovery");
                        self.fatal = true;
                    }
                    action => log::debug!("frame dropped: {action:?}"),
                }
                return;
            }
        };

        // Render pass borrows frame.encoder; dropped before submit() takes frame.
        {
            let load = match recording.clear {
                Some(c) => wgpu::LoadOp::Clear(c.to_wgpu()),
                None => wgpu::LoadOp::Load,
            };

            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("prism frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for draw in &recording.draws {
                // Resources deleted after the draw was recorded are skipped.
                let Some(prog) = self.programs.get(&draw.program) else { continue };
                let Some(Some(pipeline)) = prog.pipelines.get(&draw.layout) else { continue };
                let Some(buffer) = self.buffers.get(&draw.buffer) else { continue };

                rpass.set_pipeline(pipeline);
                match (draw.uniform_offset, prog.bind_group.as_ref()) {
                    (Some(offset), Some((_, bind_group))) => {
                        rpass.set_bind_group(0, bind_group, &[offset]);
                    }
                    (None, _) => {}
                    (Some(_), None) => continue,
                }
                rpass.set_vertex_buffer(0, buffer.slice(..));
                rpass.draw(draw.first..draw.first + draw.count, 0..1);
            }
        }

        self.gpu.submit(frame);
    }
}

/// Compiles WGSL inside a validation scope so a bad module comes back as an
/// error instead of reaching the uncaptured-error handler.
fn compile_module(
    device: &wgpu::Device,
    label: &str,
    wgsl: &str,
) -> Result<wgpu::ShaderModule, GraphicsError> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(wgsl.into()),
    });

    match pollster::block_on(scope.pop()) {
        Some(err) => Err(GraphicsError::ProgramCreation {
            label: label.to_string(),
            message: err.to_string(),
        }),
        None => Ok(module),
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

/// Builds the pipeline for `prog` with one interleaved vertex buffer laid out
/// as `layout`. Validation errors are logged and yield `None`.
fn build_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    prog: &GpuProgram,
    layout: &VertexLayout,
) -> Option<wgpu::RenderPipeline> {
    let attributes: Vec<wgpu::VertexAttribute> = layout
        .attributes
        .iter()
        .map(|a| wgpu::VertexAttribute {
            format: a.format.to_wgpu(),
            offset: a.offset as u64,
            shader_location: a.location,
        })
        .collect();

    let vertex_buffers = [wgpu::VertexBufferLayout {
        array_stride: layout.stride as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &attributes,
    }];
    let buffers: &[wgpu::VertexBufferLayout] = if attributes.is_empty() {
        &[]
    } else {
        &vertex_buffers
    };

    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} pipeline", prog.label)),
        layout: Some(&prog.pipeline_layout),

        vertex: wgpu::VertexState {
            module: &prog.module,
            entry_point: Some(&prog.vertex_entry),
            compilation_options: Default::default(),
            buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: &prog.module,
            entry_point: Some(&prog.fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(scope.pop()) {
        log::error!("pipeline for program '{}' rejected: {err}", prog.label);
        return None;
    }

    log::debug!(
        "built pipeline for '{}' (stride {}, {} attributes)",
        prog.label,
        layout.stride,
        layout.attributes.len()
    );
    Some(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_snapshots_are_aligned() {
        let mut rec = FrameRecording::default();
        assert_eq!(rec.push_uniforms(&[1; 32], 256), 0);
        assert_eq!(rec.push_uniforms(&[2; 16], 256), 256);
        assert_eq!(rec.push_uniforms(&[3; 16], 256), 512);
        assert_eq!(rec.uniform_bytes.len(), 528);
        assert_eq!(rec.uniform_bytes[256], 2);
        assert_eq!(rec.uniform_bytes[40], 0);
    }

    /// Surface-less device on whatever adapter the host offers.
    fn headless_device() -> Option<wgpu::Device> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok()?;
        let (device, _queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()?;
        Some(device)
    }

    #[test]
    fn invalid_wgsl_is_a_program_creation_error() {
        let Some(device) = headless_device() else {
            eprintln!("no adapter available; skipping");
            return;
        };

        let err = compile_module(&device, "broken", "fn oops(").unwrap_err();
        match err {
            GraphicsError::ProgramCreation { label, message } => {
                assert_eq!(label, "broken");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn valid_wgsl_compiles() {
        let Some(device) = headless_device() else {
            eprintln!("no adapter available; skipping");
            return;
        };

        let wgsl = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }";
        assert!(compile_module(&device, "ok", wgsl).is_ok());
    }
}
