#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Planet
//!
//! Procedural sphere-shaped voxel planets, streamed in chunks around a moving
//! camera and meshed with greedy quad merging.
//!
//! The crate owns the voxel data, generation, streaming and meshing. Drawing
//! is left to the host: it supplies a [`MeshSinkFactory`] whose sinks receive
//! vertex lists laid out as [`Vertex::desc`] describes and issue the draws.
//!
//! ## Key Modules
//!
//! * `engine_state` - The [`EngineState`] facade and every subsystem behind it
//! * `engine_state::voxels` - Blocks, chunks, the planet sampler and streaming
//! * `engine_state::rendering` - Greedy meshing, mesh sinks and draw ordering
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = EngineState::new(EngineConfig::default(), Box::new(my_sink_factory));
//! loop {
//!     engine.frame(camera_position, camera_forward);
//!     engine.draw_opaque();
//!     engine.draw_water_sorted();
//! }
//! ```
//!
//! Without a GPU, [`run`] drives the same loop against in-memory sinks.

use std::env;

use cgmath::{Point3, Vector3};
use log::info;

pub mod engine_state;

pub use engine_state::{
    config::{ConfigError, EngineConfig},
    rendering::{HeadlessMeshSinkFactory, MeshSink, MeshSinkFactory, Vertex},
    EngineState,
};

/// Frames the headless flight lasts.
const FLIGHT_FRAMES: u32 = 600;
/// Frames between progress reports.
const REPORT_INTERVAL: u32 = 60;
/// Voxels flown per frame.
const FLIGHT_SPEED: f32 = 2.0;
/// Height of the flight path above the highest possible terrain.
const FLIGHT_CLEARANCE: f32 = 8.0;

/// Camera position and forward vector `frame` frames into a great-circle
/// orbit of radius `altitude` in the XY plane.
fn orbit_camera(frame: u32, altitude: f32) -> (Point3<f32>, Vector3<f32>) {
    let angle = frame as f32 * FLIGHT_SPEED / altitude;
    let (sin, cos) = angle.sin_cos();
    (
        Point3::new(altitude * sin, altitude * cos, 0.0),
        Vector3::new(cos, -sin, 0.0),
    )
}

/// Runs the engine headless: streams the planet under a camera orbiting just
/// above the terrain and logs streaming statistics.
///
/// The first command line argument, if any, is a JSON configuration file.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };

    let sink_factory = HeadlessMeshSinkFactory::new();
    let sink_stats = sink_factory.stats();
    let mut engine = EngineState::new(config, Box::new(sink_factory));

    let altitude = (config.planet.max_radius() as f32) + FLIGHT_CLEARANCE;
    let start = web_time::Instant::now();

    for frame in 0..FLIGHT_FRAMES {
        let (position, forward) = orbit_camera(frame, altitude);
        engine.frame(position, forward);
        engine.draw_opaque();
        engine.draw_water_sorted();

        if frame % REPORT_INTERVAL == 0 {
            let stats = engine.stream_stats();
            info!(
                "Frame {}: {}/{} meshed, {} generated, {} loaded, queues {}/{}, ready: {}",
                frame,
                stats.meshed,
                stats.target,
                stats.generated,
                stats.loaded,
                stats.gen_queue,
                stats.mesh_queue,
                engine.is_stream_ready()
            );
        }
    }

    info!(
        "Flew {} frames in {:?}: {} sinks live, {} uploads, {} vertices uploaded, {} draws",
        FLIGHT_FRAMES,
        start.elapsed(),
        sink_stats.live(),
        sink_stats.uploads.get(),
        sink_stats.uploaded_vertices.get(),
        sink_stats.draws.get()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, MetricSpace};

    use super::*;

    #[test]
    fn orbit_stays_at_altitude_and_looks_along_the_path() {
        for frame in [0, 1, 250, 599] {
            let (position, forward) = orbit_camera(frame, 100.0);
            assert!((position.distance(Point3::new(0.0, 0.0, 0.0)) - 100.0).abs() < 1e-3);
            assert!((forward.magnitude() - 1.0).abs() < 1e-5);
            let radial = Vector3::new(position.x, position.y, position.z);
            assert!(forward.dot(radial).abs() < 1e-3);
        }
    }
}
