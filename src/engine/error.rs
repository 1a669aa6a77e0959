use thiserror::Error;

use crate::engine::components::mesh::GeometryError;
use crate::engine::components::shader_program::ShaderError;
use crate::engine::config::ConfigError;

/// Top-level error for setting up and running the demo.
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Failed to initialize graphics context: {0}")]
    Context(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

pub type DemoResult<T> = Result<T, DemoError>;
