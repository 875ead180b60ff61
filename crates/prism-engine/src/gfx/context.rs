use crate::paint::Color;

use super::GraphicsError;

/// Opaque handle to a compiled program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ProgramId(u32);

impl ProgramId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Opaque handle to a vertex buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BufferId(u32);

impl BufferId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Shader input location of a vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct AttribLocation(pub u32);

/// Byte offset of a uniform inside its program's uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub u32);

/// Per-vertex attribute format. All formats are `f32` lanes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttribFormat {
    Float32x2,
    Float32x3,
    Float32x4,
}

impl AttribFormat {
    #[inline]
    pub const fn size(self) -> u32 {
        match self {
            AttribFormat::Float32x2 => 8,
            AttribFormat::Float32x3 => 12,
            AttribFormat::Float32x4 => 16,
        }
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::VertexFormat {
        match self {
            AttribFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
            AttribFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
            AttribFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
        }
    }
}

/// Named vertex input, matching an `@location(n)` in the vertex entry point.
#[derive(Debug, Copy, Clone)]
pub struct AttribSlot<'a> {
    pub name: &'a str,
    pub location: u32,
}

/// Named member of the program's `@group(0) @binding(0)` uniform struct.
#[derive(Debug, Copy, Clone)]
pub struct UniformSlot<'a> {
    pub name: &'a str,
    pub offset: u32,
}

/// Everything needed to build a program.
///
/// WGSL has no reflection at this level, so the attribute and uniform names a
/// program exposes are declared next to its source. `uniform_size` is the
/// size of the uniform struct; zero means the program has no uniforms.
#[derive(Debug, Copy, Clone)]
pub struct ProgramSource<'a> {
    pub label: &'a str,
    pub wgsl: &'a str,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub attributes: &'a [AttribSlot<'a>],
    pub uniforms: &'a [UniformSlot<'a>],
    pub uniform_size: u32,
}

/// Owned name tables of a created program.
#[derive(Debug, Clone, Default)]
pub struct ProgramInterface {
    attributes: Vec<(String, u32)>,
    uniforms: Vec<(String, u32)>,
    uniform_size: u32,
}

impl ProgramInterface {
    /// Captures the name tables of `source`, rounding the uniform block to
    /// WGSL's 16-byte struct alignment.
    pub fn from_source(source: &ProgramSource<'_>) -> Self {
        Self {
            attributes: source
                .attributes
                .iter()
                .map(|a| (a.name.to_string(), a.location))
                .collect(),
            uniforms: source
                .uniforms
                .iter()
                .map(|u| (u.name.to_string(), u.offset))
                .collect(),
            uniform_size: source.uniform_size.next_multiple_of(16),
        }
    }

    pub fn attrib(&self, name: &str) -> Option<AttribLocation> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, loc)| AttribLocation(*loc))
    }

    pub fn uniform(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, off)| UniformLocation(*off))
    }

    /// Uniform block size in bytes (multiple of 16).
    pub fn uniform_size(&self) -> u32 {
        self.uniform_size
    }
}

/// GL-style drawing capability handed to applications.
///
/// Calls are synchronous from the caller's point of view. Only program
/// creation reports failure; misuse of the per-frame calls (unknown handles,
/// incomplete draw state) is logged by the backend and the call is ignored.
pub trait GraphicsContext {
    fn create_program(&mut self, source: &ProgramSource<'_>) -> Result<ProgramId, GraphicsError>;
    fn delete_program(&mut self, program: ProgramId);

    /// Creates an immutable vertex buffer holding `contents`.
    fn create_buffer(&mut self, label: &str, contents: &[u8]) -> BufferId;
    fn delete_buffer(&mut self, buffer: BufferId);

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation>;
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Clears the whole frame to `color` before any draw of this frame.
    fn clear(&mut self, color: Color);

    fn use_program(&mut self, program: ProgramId);

    /// Uniform setters write into the current program's uniform block.
    fn uniform1f(&mut self, location: UniformLocation, v: f32);
    fn uniform2f(&mut self, location: UniformLocation, x: f32, y: f32);
    fn uniform4f(&mut self, location: UniformLocation, x: f32, y: f32, z: f32, w: f32);

    fn bind_buffer(&mut self, buffer: BufferId);

    fn enable_vertex_attrib(&mut self, location: AttribLocation);
    fn disable_vertex_attrib(&mut self, location: AttribLocation);
    fn vertex_attrib_pointer(
        &mut self,
        location: AttribLocation,
        format: AttribFormat,
        stride: u32,
        offset: u32,
    );

    /// Draws `count` vertices starting at `first` as a triangle list.
    fn draw_triangles(&mut self, first: u32, count: u32);

    /// Presents everything drawn since the previous publish.
    fn publish(&mut self);
}
