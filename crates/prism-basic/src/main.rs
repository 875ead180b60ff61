//! Draggable, scalable triangle.
//!
//! Drag with the mouse or a finger; `+`/`=` and `-` scale the triangle.

mod config;
mod controller;
mod geometry;
mod program;
mod state;

use anyhow::Result;

use prism_engine::logging::init_logging;
use prism_engine::overlay::FpsOverlay;
use prism_engine::window::Runtime;

use crate::config::BasicConfig;
use crate::controller::TriangleController;

fn main() -> Result<()> {
    let BasicConfig {
        runtime,
        gpu,
        logging,
        scene,
    } = BasicConfig::default();

    init_logging(logging);
    log::info!("starting '{}' ({:?})", runtime.title, scene.color_mode);

    if scene.show_fps {
        Runtime::run(runtime, gpu, TriangleController::new(scene, FpsOverlay::new()))
    } else {
        Runtime::run(runtime, gpu, TriangleController::new(scene, ()))
    }
}
