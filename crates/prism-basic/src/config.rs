use winit::dpi::LogicalSize;

use prism_engine::device::GpuInit;
use prism_engine::logging::LoggingConfig;
use prism_engine::paint::Color;
use prism_engine::window::RuntimeConfig;

/// How the triangle is filled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ColorMode {
    /// Colors interpolated from the vertex data.
    PerVertex,
    /// One color for the whole triangle.
    Uniform(Color),
}

impl ColorMode {
    pub const FOREGROUND: Color = Color::opaque(0.0, 1.0, 0.0);
}

impl Default for ColorMode {
    fn default() -> Self {
        if cfg!(feature = "uniform-color") {
            ColorMode::Uniform(Self::FOREGROUND)
        } else {
            ColorMode::PerVertex
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub background: Color,
    pub color_mode: ColorMode,
    /// Factor applied per `+` press; `-` divides by it.
    pub scale_step: f32,
    pub show_fps: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: Color::opaque(0.2, 0.2, 0.2),
            color_mode: ColorMode::default(),
            scale_step: 1.1,
            show_fps: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BasicConfig {
    pub runtime: RuntimeConfig,
    pub gpu: GpuInit,
    pub logging: LoggingConfig,
    pub scene: SceneConfig,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig {
                title: "prism basic".to_string(),
                initial_size: LogicalSize::new(800.0, 600.0),
            },
            gpu: GpuInit::default(),
            logging: LoggingConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}
