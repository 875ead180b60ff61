use std::collections::{HashMap, HashSet};

use crate::core::FrameScheduler;
use crate::paint::Color;

use super::{
    AttribFormat, AttribLocation, BindingState, BufferId, DrawCall, GraphicsContext,
    GraphicsError, ProgramId, ProgramInterface, ProgramSource, UniformLocation,
};

/// One recorded [`GraphicsContext`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// `program` is `None` when creation failed.
    CreateProgram { label: String, program: Option<ProgramId> },
    DeleteProgram(ProgramId),
    CreateBuffer { label: String, buffer: BufferId, len: usize },
    DeleteBuffer(BufferId),
    Clear(Color),
    UseProgram(ProgramId),
    Uniform { location: UniformLocation, values: Vec<f32> },
    BindBuffer(BufferId),
    EnableAttrib(AttribLocation),
    DisableAttrib(AttribLocation),
    AttribPointer {
        location: AttribLocation,
        format: AttribFormat,
        stride: u32,
        offset: u32,
    },
    Draw(DrawCall),
    /// A call the binding rules refused.
    Rejected(GraphicsError),
    Publish,
}

/// Headless graphics context that records every call.
///
/// Draws are validated through [`BindingState`] exactly like the GPU backend,
/// so a recorded `Call::Draw` is one the GPU backend would have encoded.
#[derive(Debug, Default)]
pub struct RecordingGraphics {
    calls: Vec<Call>,
    programs: HashMap<ProgramId, ProgramInterface>,
    buffers: HashMap<BufferId, Vec<u8>>,
    bindings: BindingState,
    next_id: u32,
    failing: HashSet<String>,
}

impl RecordingGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `create_program` with this label fail.
    pub fn fail_program(&mut self, label: &str) {
        self.failing.insert(label.to_string());
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Returns and clears the recorded calls. Resources stay alive.
    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    pub fn draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter_map(|c| match c {
            Call::Draw(d) => Some(d),
            _ => None,
        })
    }

    pub fn draw_count(&self) -> usize {
        self.draws().count()
    }

    pub fn publish_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Publish).count()
    }

    pub fn rejected(&self) -> impl Iterator<Item = &GraphicsError> {
        self.calls.iter().filter_map(|c| match c {
            Call::Rejected(e) => Some(e),
            _ => None,
        })
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffer_contents(&self, buffer: BufferId) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(Vec::as_slice)
    }

    fn next_raw(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn record_result(&mut self, call: Call, result: Result<(), GraphicsError>) {
        match result {
            Ok(()) => self.calls.push(call),
            Err(e) => self.calls.push(Call::Rejected(e)),
        }
    }
}

impl GraphicsContext for RecordingGraphics {
    fn create_program(&mut self, source: &ProgramSource<'_>) -> Result<ProgramId, GraphicsError> {
        if self.failing.contains(source.label) {
            self.calls.push(Call::CreateProgram {
                label: source.label.to_string(),
                program: None,
            });
            return Err(GraphicsError::ProgramCreation {
                label: source.label.to_string(),
                message: "compilation failed".to_string(),
            });
        }

        let id = ProgramId::from_raw(self.next_raw());
        let iface = ProgramInterface::from_source(source);
        self.bindings.register_program(id, iface.uniform_size());
        self.programs.insert(id, iface);
        self.calls.push(Call::CreateProgram {
            label: source.label.to_string(),
            program: Some(id),
        });
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
        self.bindings.forget_program(program);
        self.calls.push(Call::DeleteProgram(program));
    }

    fn create_buffer(&mut self, label: &str, contents: &[u8]) -> BufferId {
        let id = BufferId::from_raw(self.next_raw());
        self.buffers.insert(id, contents.to_vec());
        self.bindings.register_buffer(id);
        self.calls.push(Call::CreateBuffer {
            label: label.to_string(),
            buffer: id,
            len: contents.len(),
        });
        id
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
        self.bindings.forget_buffer(buffer);
        self.calls.push(Call::DeleteBuffer(buffer));
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation> {
        self.programs.get(&program)?.attrib(name)
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.programs.get(&program)?.uniform(name)
    }

    fn clear(&mut self, color: Color) {
        self.calls.push(Call::Clear(color));
    }

    fn use_program(&mut self, program: ProgramId) {
        let result = self.bindings.use_program(program);
        self.record_result(Call::UseProgram(program), result);
    }

    fn uniform1f(&mut self, location: UniformLocation, v: f32) {
        let result = self.bindings.write_uniform(location, &[v]);
        self.record_result(Call::Uniform { location, values: vec![v] }, result);
    }

    fn uniform2f(&mut self, location: UniformLocation, x: f32, y: f32) {
        let result = self.bindings.write_uniform(location, &[x, y]);
        self.record_result(Call::Uniform { location, values: vec![x, y] }, result);
    }

    fn uniform4f(&mut self, location: UniformLocation, x: f32, y: f32, z: f32, w: f32) {
        let result = self.bindings.write_uniform(location, &[x, y, z, w]);
        self.record_result(Call::Uniform { location, values: vec![x, y, z, w] }, result);
    }

    fn bind_buffer(&mut self, buffer: BufferId) {
        let result = self.bindings.bind_buffer(buffer);
        self.record_result(Call::BindBuffer(buffer), result);
    }

    fn enable_vertex_attrib(&mut self, location: AttribLocation) {
        self.bindings.enable(location);
        self.calls.push(Call::EnableAttrib(location));
    }

    fn disable_vertex_attrib(&mut self, location: AttribLocation) {
        self.bindings.disable(location);
        self.calls.push(Call::DisableAttrib(location));
    }

    fn vertex_attrib_pointer(
        &mut self,
        location: AttribLocation,
        format: AttribFormat,
        stride: u32,
        offset: u32,
    ) {
        self.bindings.pointer(location, format, stride, offset);
        self.calls.push(Call::AttribPointer {
            location,
            format,
            stride,
            offset,
        });
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        match self.bindings.draw_call(first, count) {
            Ok(call) => self.calls.push(Call::Draw(call)),
            Err(e) => self.calls.push(Call::Rejected(e)),
        }
    }

    fn publish(&mut self) {
        self.calls.push(Call::Publish);
    }
}

/// Scheduler that only counts frame requests.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    requests: u32,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> u32 {
        self.requests
    }
}

impl FrameScheduler for RecordingScheduler {
    fn request_frame(&mut self) {
        self.requests += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{AttribSlot, UniformSlot};

    const SOURCE: ProgramSource<'static> = ProgramSource {
        label: "flat",
        wgsl: "",
        vertex_entry: "vs_main",
        fragment_entry: "fs_main",
        attributes: &[AttribSlot { name: "position", location: 0 }],
        uniforms: &[UniformSlot { name: "tint", offset: 0 }],
        uniform_size: 16,
    };

    #[test]
    fn records_a_valid_draw() {
        let mut g = RecordingGraphics::new();
        let p = g.create_program(&SOURCE).unwrap();
        let b = g.create_buffer("tri", &[0; 36]);
        let pos = g.attrib_location(p, "position").unwrap();
        let tint = g.uniform_location(p, "tint").unwrap();

        g.use_program(p);
        g.uniform4f(tint, 1.0, 0.0, 0.0, 1.0);
        g.bind_buffer(b);
        g.enable_vertex_attrib(pos);
        g.vertex_attrib_pointer(pos, AttribFormat::Float32x3, 12, 0);
        g.draw_triangles(0, 3);
        g.publish();

        assert_eq!(g.draw_count(), 1);
        assert_eq!(g.publish_count(), 1);
        assert_eq!(g.rejected().count(), 0);
    }

    #[test]
    fn failing_label_reports_program_creation_error() {
        let mut g = RecordingGraphics::new();
        g.fail_program("flat");

        let err = g.create_program(&SOURCE).unwrap_err();
        assert!(matches!(err, GraphicsError::ProgramCreation { .. }));
        assert_eq!(g.live_programs(), 0);
    }

    #[test]
    fn deleted_resources_are_no_longer_live() {
        let mut g = RecordingGraphics::new();
        let p = g.create_program(&SOURCE).unwrap();
        let b = g.create_buffer("tri", &[1, 2, 3]);
        assert_eq!(g.buffer_contents(b), Some(&[1u8, 2, 3][..]));

        g.delete_program(p);
        g.delete_buffer(b);
        assert_eq!(g.live_programs(), 0);
        assert_eq!(g.live_buffers(), 0);
        assert_eq!(g.attrib_location(p, "position"), None);
    }

    #[test]
    fn draw_after_delete_is_rejected() {
        let mut g = RecordingGraphics::new();
        let p = g.create_program(&SOURCE).unwrap();
        let b = g.create_buffer("tri", &[0; 36]);
        g.use_program(p);
        g.bind_buffer(b);
        g.delete_program(p);
        g.draw_triangles(0, 3);

        assert_eq!(g.draw_count(), 0);
        assert_eq!(g.rejected().collect::<Vec<_>>(), vec![&GraphicsError::NoProgram]);
    }
}
