use prism_engine::gfx::{AttribSlot, ProgramSource, UniformSlot};

use crate::config::ColorMode;

const WGSL: &str = include_str!("shaders/triangle.wgsl");

/// Byte offsets into the shader's `Params` block.
const UNIFORMS: &[UniformSlot<'static>] = &[
    UniformSlot { name: "offset", offset: 0 },
    UniformSlot { name: "aspect", offset: 8 },
    UniformSlot { name: "scale", offset: 12 },
    UniformSlot { name: "color", offset: 16 },
];

static PER_VERTEX: ProgramSource<'static> = ProgramSource {
    label: "prism triangle",
    wgsl: WGSL,
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
    attributes: &[
        AttribSlot { name: "position", location: 0 },
        AttribSlot { name: "color", location: 1 },
    ],
    uniforms: UNIFORMS,
    uniform_size: 32,
};

static UNIFORM_COLOR: ProgramSource<'static> = ProgramSource {
    label: "prism triangle (uniform color)",
    wgsl: WGSL,
    vertex_entry: "vs_position_only",
    fragment_entry: "fs_main",
    attributes: &[AttribSlot { name: "position", location: 0 }],
    uniforms: UNIFORMS,
    uniform_size: 32,
};

/// Shader program for a color mode.
pub fn triangle_program(mode: ColorMode) -> &'static ProgramSource<'static> {
    match mode {
        ColorMode::PerVertex => &PER_VERTEX,
        ColorMode::Uniform(_) => &UNIFORM_COLOR,
    }
}
