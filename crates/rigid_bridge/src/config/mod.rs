//! Configuration system
//!
//! World settings can be kept in a `.toml` or `.ron` file and loaded through
//! the [`Config`] trait.

pub use serde::{Deserialize, Serialize};

use std::path::PathBuf;
use std::time::Duration;

use crate::foundation::math::Vec3;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Settings applied when a world is created
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Gravity applied at creation, in this layer's convention (+Y is up)
    pub gravity: Option<[f32; 3]>,
    /// Directory relative mesh paths are resolved against
    pub mesh_directory: Option<PathBuf>,
    /// Upper bound for the elapsed time handed to a single native step
    pub max_step_seconds: Option<f32>,
}

impl WorldConfig {
    /// Set the initial gravity
    pub fn with_gravity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.gravity = Some([x, y, z]);
        self
    }

    /// Set the mesh directory
    pub fn with_mesh_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.mesh_directory = Some(directory.into());
        self
    }

    /// Set the step clamp
    pub fn with_max_step_seconds(mut self, seconds: f32) -> Self {
        self.max_step_seconds = Some(seconds);
        self
    }

    /// Initial gravity as a vector
    pub fn gravity_vector(&self) -> Option<Vec3> {
        self.gravity.map(|[x, y, z]| Vec3::new(x, y, z))
    }

    /// Step clamp as a duration
    ///
    /// Values that are negative, non-finite or too large for a [`Duration`]
    /// are logged and ignored.
    pub fn max_step(&self) -> Option<Duration> {
        self.max_step_seconds.and_then(|seconds| {
            let step = Duration::try_from_secs_f32(seconds).ok();
            if step.is_none() {
                log::warn!("Ignoring invalid max_step_seconds {}", seconds);
            }
            step
        })
    }
}

impl Config for WorldConfig {}
