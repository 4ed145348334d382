//! Engine configuration, loaded from JSON.
//!
//! Every field has a default, so a configuration file only needs the values
//! it changes:
//!
//! ```json
//! { "planet": { "base_radius": 256.0 }, "streaming": { "render_distance": 6 } }
//! ```

use std::{fs, io, path::Path};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    rendering::AtlasLayout,
    voxels::{planet::PlanetParams, streaming::StreamingConfig},
};

/// Failure to obtain an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything tunable about the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub planet: PlanetParams,
    pub streaming: StreamingConfig,
    pub atlas: AtlasLayout,
}

impl EngineConfig {
    /// Parses a configuration, correcting invalid streaming distances.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Reads and parses the configuration file at `path`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Corrects streaming distances and atlas layouts that cannot work.
    pub fn validated(mut self) -> Self {
        self.streaming = self.streaming.validated();
        self.atlas = self.atlas.validated();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.planet.base_radius, 1024.0);
        assert_eq!(config.planet.sea_level_offset, -2.0);
        assert_eq!(config.streaming.render_distance, 4);
        assert_eq!(config.streaming.unload_distance, 6);
        assert_eq!(config.atlas.columns, 4);
        assert_eq!(config.atlas.height, 96);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "planet": { "base_radius": 256.0, "octaves": 4 },
                 "streaming": { "max_gen_per_frame": 2 } }"#,
        )
        .unwrap();
        assert_eq!(config.planet.base_radius, 256.0);
        assert_eq!(config.planet.octaves, 4);
        assert_eq!(config.planet.max_height, 512.0);
        assert_eq!(config.streaming.max_gen_per_frame, 2);
        assert_eq!(config.streaming.front_bias, 6.0);
    }

    #[test]
    fn unload_distance_is_pushed_past_render_distance() {
        let config = EngineConfig::from_json_str(
            r#"{ "streaming": { "render_distance": 8, "unload_distance": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.streaming.render_distance, 8);
        assert_eq!(config.streaming.unload_distance, 9);
    }

    #[test]
    fn atlas_without_room_for_the_cube_net_is_replaced() {
        let config = EngineConfig::from_json_str(
            r#"{ "atlas": { "columns": 1, "rows": 1, "width": 16, "height": 16 } }"#,
        )
        .unwrap();
        assert_eq!(config.atlas, AtlasLayout::default());

        let config =
            EngineConfig::from_json_str(r#"{ "atlas": { "width": 512, "height": 384 } }"#).unwrap();
        assert_eq!(config.atlas.width, 512);
        assert_eq!(config.atlas.columns, 4);
    }

    #[test]
    fn errors_are_classified() {
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "planet": { "octaves": "many" } }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::load_from_file("/nonexistent/voxel-planet.json"),
            Err(ConfigError::Read(_))
        ));
    }
}
