//! GL-style graphics context.
//!
//! Applications drive rendering through the [`GraphicsContext`] trait: named
//! programs, vertex buffers, attribute pointers, uniforms and draw calls,
//! finished by `publish`. Two backends implement it:
//! - [`GpuGraphics`] records calls and replays them as a wgpu render pass
//! - [`RecordingGraphics`] is headless and keeps the call stream for inspection
//!
//! Backend-independent binding rules live in [`BindingState`].

mod binding;
mod context;
mod error;
mod gpu;
mod recording;

pub use binding::{BindingState, DrawCall, VertexAttrib, VertexLayout};
pub use context::{
    AttribFormat, AttribLocation, AttribSlot, BufferId, GraphicsContext, ProgramId,
    ProgramInterface, ProgramSource, UniformLocation, UniformSlot,
};
pub use error::GraphicsError;
pub use gpu::GpuGraphics;
pub use recording::{Call, RecordingGraphics, RecordingScheduler};
