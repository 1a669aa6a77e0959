//! Startup configuration.
//!
//! Every field has a default, so the demo runs without any file. A JSON file
//! named by [`CONFIG_ENV`] may override any subset of the fields.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the path of an optional JSON config file.
pub const CONFIG_ENV: &str = "PYRAMID_GL_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "First OPENGL".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub clear_color: [f32; 4],
    pub projection: ProjectionConfig,
    /// Requested OpenGL core profile version as `[major, minor]`.
    pub gl_version: [u8; 2],
    pub log_filter: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            clear_color: [115.0 / 255.0, 95.0 / 255.0, 186.0 / 255.0, 1.0],
            projection: ProjectionConfig::default(),
            gl_version: [3, 3],
            log_filter: None,
        }
    }
}

impl DemoConfig {
    /// Loads the config named by [`CONFIG_ENV`], or the defaults when unset.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be nonzero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        let p = &self.projection;
        if !(p.fov_y_degrees > 0.0 && p.fov_y_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_y_degrees must be in (0, 180), got {}",
                p.fov_y_degrees
            )));
        }
        if !(p.near > 0.0 && p.far > p.near) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                p.near, p.far
            )));
        }

        if self.gl_version[0] < 3 || (self.gl_version[0] == 3 && self.gl_version[1] < 3) {
            return Err(ConfigError::Invalid(format!(
                "GLSL 330 core needs OpenGL 3.3 or newer, got {}.{}",
                self.gl_version[0], self.gl_version[1]
            )));
        }

        Ok(())
    }
}
