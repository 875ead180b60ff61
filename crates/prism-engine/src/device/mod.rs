//! GPU device + surface management.
//!
//! [`Gpu`] owns the wgpu Instance/Device/Queue and the window surface;
//! [`GpuInit`] picks its format, present mode and limits.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceRecovery;
