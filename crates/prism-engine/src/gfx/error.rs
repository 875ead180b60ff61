use std::fmt;

use super::{BufferId, ProgramId};

/// Errors raised by a [`GraphicsContext`](super::GraphicsContext) backend.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicsError {
    /// Shader compilation or program validation failed.
    ProgramCreation { label: String, message: String },
    UnknownProgram(ProgramId),
    UnknownBuffer(BufferId),
    /// Draw or uniform write without a current program.
    NoProgram,
    /// Draw without a bound vertex buffer.
    NoBuffer,
    /// An enabled attribute has no pointer.
    MissingAttribPointer(u32),
    /// Enabled attributes disagree on the vertex stride.
    MixedStrides,
    /// Uniform write past the end of the program's uniform block.
    UniformOutOfRange { offset: u32, len: u32, size: u32 },
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::ProgramCreation { label, message } => {
                write!(f, "failed to create program '{label}': {message}")
            }
            GraphicsError::UnknownProgram(id) => write!(f, "unknown program {}", id.raw()),
            GraphicsError::UnknownBuffer(id) => write!(f, "unknown buffer {}", id.raw()),
            GraphicsError::NoProgram => write!(f, "no program in use"),
            GraphicsError::NoBuffer => write!(f, "no vertex buffer bound"),
            GraphicsError::MissingAttribPointer(loc) => {
                write!(f, "attribute {loc} is enabled but has no pointer")
            }
            GraphicsError::MixedStrides => {
                write!(f, "enabled attributes use different vertex strides")
            }
            GraphicsError::UniformOutOfRange { offset, len, size } => write!(
                f,
                "uniform write of {len} bytes at offset {offset} exceeds block of {size} bytes"
            ),
        }
    }
}

impl std::error::Error for GraphicsError {}
