use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::{AttribFormat, AttribLocation, BufferId, GraphicsError, ProgramId, UniformLocation};

/// One vertex input of a resolved draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexAttrib {
    pub location: u32,
    pub format: AttribFormat,
    pub offset: u32,
}

/// Interleaved single-buffer vertex layout, attributes ordered by location.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct VertexLayout {
    pub stride: u32,
    pub attributes: Vec<VertexAttrib>,
}

/// A draw with all state resolved at the time it was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub program: ProgramId,
    pub buffer: BufferId,
    pub layout: VertexLayout,
    /// Snapshot of the program's uniform block.
    pub uniforms: Vec<u8>,
    pub first: u32,
    pub count: u32,
}

#[derive(Debug, Copy, Clone)]
struct AttribPointer {
    format: AttribFormat,
    stride: u32,
    offset: u32,
}

/// Bind state of a GL-style context.
///
/// Tracks the current program and buffer, enabled attributes and their
/// pointers, and one uniform block per program. Uniform values persist per
/// program across draws and frames, as in GL.
#[derive(Debug, Default)]
pub struct BindingState {
    program: Option<ProgramId>,
    buffer: Option<BufferId>,
    enabled: BTreeSet<u32>,
    pointers: BTreeMap<u32, AttribPointer>,
    uniforms: HashMap<ProgramId, Vec<u8>>,
    buffers: HashSet<BufferId>,
}

impl BindingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_program(&mut self, program: ProgramId, uniform_size: u32) {
        self.uniforms.insert(program, vec![0; uniform_size as usize]);
    }

    /// Drops a program; unbinds it when current.
    pub fn forget_program(&mut self, program: ProgramId) {
        self.uniforms.remove(&program);
        if self.program == Some(program) {
            self.program = None;
        }
    }

    pub fn register_buffer(&mut self, buffer: BufferId) {
        self.buffers.insert(buffer);
    }

    /// Drops a buffer; unbinds it when bound.
    pub fn forget_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
        if self.buffer == Some(buffer) {
            self.buffer = None;
        }
    }

    pub fn current_program(&self) -> Option<ProgramId> {
        self.program
    }

    pub fn use_program(&mut self, program: ProgramId) -> Result<(), GraphicsError> {
        if !self.uniforms.contains_key(&program) {
            return Err(GraphicsError::UnknownProgram(program));
        }
        self.program = Some(program);
        Ok(())
    }

    pub fn bind_buffer(&mut self, buffer: BufferId) -> Result<(), GraphicsError> {
        if !self.buffers.contains(&buffer) {
            return Err(GraphicsError::UnknownBuffer(buffer));
        }
        self.buffer = Some(buffer);
        Ok(())
    }

    pub fn enable(&mut self, location: AttribLocation) {
        self.enabled.insert(location.0);
    }

    pub fn disable(&mut self, location: AttribLocation) {
        self.enabled.remove(&location.0);
    }

    pub fn pointer(&mut self, location: AttribLocation, format: AttribFormat, stride: u32, offset: u32) {
        self.pointers.insert(location.0, AttribPointer { format, stride, offset });
    }

    /// Writes `values` as native-endian `f32`s into the current program's block.
    pub fn write_uniform(&mut self, location: UniformLocation, values: &[f32]) -> Result<(), GraphicsError> {
        let program = self.program.ok_or(GraphicsError::NoProgram)?;
        let block = self
            .uniforms
            .get_mut(&program)
            .ok_or(GraphicsError::UnknownProgram(program))?;

        let bytes: &[u8] = bytemuck::cast_slice(values);
        let start = location.0 as usize;
        let end = start + bytes.len();
        if end > block.len() {
            return Err(GraphicsError::UniformOutOfRange {
                offset: location.0,
                len: bytes.len() as u32,
                size: block.len() as u32,
            });
        }

        block[start..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Resolves the current state into a draw call.
    pub fn draw_call(&self, first: u32, count: u32) -> Result<DrawCall, GraphicsError> {
        let program = self.program.ok_or(GraphicsError::NoProgram)?;
        let buffer = self.buffer.ok_or(GraphicsError::NoBuffer)?;
        let uniforms = self
            .uniforms
            .get(&program)
            .ok_or(GraphicsError::UnknownProgram(program))?
            .clone();

        let mut stride = None;
        let mut attributes = Vec::with_capacity(self.enabled.len());
        for &location in &self.enabled {
            let ptr = self
                .pointers
                .get(&location)
                .ok_or(GraphicsError::MissingAttribPointer(location))?;

            match stride {
                None => stride = Some(ptr.stride),
                Some(s) if s != ptr.stride => return Err(GraphicsError::MixedStrides),
                Some(_) => {}
            }

            attributes.push(VertexAttrib {
                location,
                format: ptr.format,
                offset: ptr.offset,
            });
        }

        Ok(DrawCall {
            program,
            buffer,
            layout: VertexLayout {
                stride: stride.unwrap_or(0),
                attributes,
            },
            uniforms,
            first,
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: ProgramId = ProgramId::from_raw(1);
    const B: BufferId = BufferId::from_raw(2);

    fn ready() -> BindingState {
        let mut s = BindingState::new();
        s.register_program(P, 16);
        s.register_buffer(B);
        s.use_program(P).unwrap();
        s.bind_buffer(B).unwrap();
        s
    }

    #[test]
    fn draw_without_program_is_rejected() {
        let mut s = BindingState::new();
        s.register_buffer(B);
        s.bind_buffer(B).unwrap();
        assert_eq!(s.draw_call(0, 3), Err(GraphicsError::NoProgram));
    }

    #[test]
    fn draw_without_buffer_is_rejected() {
        let mut s = BindingState::new();
        s.register_program(P, 16);
        s.use_program(P).unwrap();
        assert_eq!(s.draw_call(0, 3), Err(GraphicsError::NoBuffer));
    }

    #[test]
    fn unknown_handles_are_rejected() {
        let mut s = BindingState::new();
        assert_eq!(s.use_program(P), Err(GraphicsError::UnknownProgram(P)));
        assert_eq!(s.bind_buffer(B), Err(GraphicsError::UnknownBuffer(B)));
    }

    #[test]
    fn enabled_attribute_needs_pointer() {
        let mut s = ready();
        s.enable(AttribLocation(0));
        assert_eq!(s.draw_call(0, 3), Err(GraphicsError::MissingAttribPointer(0)));
    }

    #[test]
    fn mixed_strides_are_rejected() {
        let mut s = ready();
        s.enable(AttribLocation(0));
        s.enable(AttribLocation(1));
        s.pointer(AttribLocation(0), AttribFormat::Float32x3, 28, 0);
        s.pointer(AttribLocation(1), AttribFormat::Float32x4, 32, 12);
        assert_eq!(s.draw_call(0, 3), Err(GraphicsError::MixedStrides));
    }

    #[test]
    fn draw_call_resolves_enabled_attributes_only() {
        let mut s = ready();
        s.pointer(AttribLocation(1), AttribFormat::Float32x4, 28, 12);
        s.pointer(AttribLocation(0), AttribFormat::Float32x3, 28, 0);
        s.enable(AttribLocation(1));
        s.enable(AttribLocation(0));
        s.disable(AttribLocation(1));

        let call = s.draw_call(0, 3).unwrap();
        assert_eq!(call.layout.stride, 28);
        assert_eq!(
            call.layout.attributes,
            vec![VertexAttrib { location: 0, format: AttribFormat::Float32x3, offset: 0 }]
        );
    }

    #[test]
    fn uniform_writes_land_at_offset() {
        let mut s = ready();
        s.write_uniform(UniformLocation(4), &[2.0, 3.0]).unwrap();

        let call = s.draw_call(0, 0).unwrap();
        let floats: Vec<f32> = call
            .uniforms
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(floats, vec![0.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn uniform_write_past_block_is_rejected() {
        let mut s = ready();
        assert_eq!(
            s.write_uniform(UniformLocation(12), &[1.0, 1.0]),
            Err(GraphicsError::UniformOutOfRange { offset: 12, len: 8, size: 16 })
        );
    }

    #[test]
    fn forgetting_current_program_unbinds_it() {
        let mut s = ready();
        s.forget_program(P);
        assert_eq!(s.current_program(), None);
        assert_eq!(s.draw_call(0, 3), Err(GraphicsError::NoProgram));
    }
}
