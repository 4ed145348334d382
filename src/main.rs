//! # Voxel Planet Headless Driver
//!
//! Native entry point. Calls into the library's `run()` to stream a planet
//! under an orbiting camera without a GPU.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match voxel_planet::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("voxel-planet: {err}");
            ExitCode::FAILURE
        }
    }
}
