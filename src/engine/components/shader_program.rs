//! Shader compilation and linking.
//!
//! Building a program is two steps: [`compile`] produces a
//! [`CompiledProgram`] with both stages attached, and
//! [`CompiledProgram::link`] turns it into a usable [`ShaderProgram`].
//! A failed compile never yields a value that can be linked.

use std::fmt;
use thiserror::Error;

use crate::engine::backend::GlBackend;

/// Upper bound on the length of a reported info log, in characters.
pub const INFO_LOG_LIMIT: usize = 1024;

pub const MODEL_UNIFORM: &str = "model";
pub const PROJECTION_UNIFORM: &str = "projection";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// The OpenGL shader type tag, e.g. `35633` for the vertex stage.
    pub fn gl_type(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ShaderError {
    #[error("Failed to create {what}: {reason}")]
    Create { what: &'static str, reason: String },
    #[error("Error compiling the {stage} shader (type {}): '{log}'", .stage.gl_type())]
    Compile { stage: ShaderStage, log: String },
    #[error("Error linking program: '{log}'")]
    Link { log: String },
}

impl ShaderError {
    /// Raw diagnostic text reported by the driver, if any.
    pub fn diagnostic(&self) -> &str {
        match self {
            ShaderError::Create { reason, .. } => reason,
            ShaderError::Compile { log, .. } | ShaderError::Link { log } => log,
        }
    }
}

/// The two external parameters of the demo program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Model,
    Projection,
}

/// Resolved uniform locations. `None` means the name was not found in the
/// linked program; such a parameter is never uploaded.
#[derive(Debug, Clone)]
pub struct ParamLocations<L> {
    pub model: Option<L>,
    pub projection: Option<L>,
}

impl<L> ParamLocations<L> {
    pub fn get(&self, param: Param) -> Option<&L> {
        match param {
            Param::Model => self.model.as_ref(),
            Param::Projection => self.projection.as_ref(),
        }
    }
}

fn bounded_log(raw: String) -> String {
    let trimmed = raw.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.is_empty() {
        return "(no info log)".to_string();
    }
    trimmed.chars().take(INFO_LOG_LIMIT).collect()
}

fn compile_stage<B: GlBackend>(
    gl: &B,
    stage: ShaderStage,
    source: &str,
) -> Result<B::Shader, ShaderError> {
    let shader = gl.create_shader(stage.gl_type()).map_err(|reason| ShaderError::Create {
        what: "shader",
        reason,
    })?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.get_shader_compile_status(shader) {
        let log = bounded_log(gl.get_shader_info_log(shader));
        log::error!("Error compiling the {} shader: '{}'", stage.gl_type(), log);
        gl.delete_shader(shader);
        return Err(ShaderError::Compile { stage, log });
    }

    Ok(shader)
}

/// A program object with both stages compiled and attached, not yet linked.
#[must_use = "a compiled program must be linked before it can draw"]
pub struct CompiledProgram<B: GlBackend> {
    program: B::Program,
    vertex: B::Shader,
    fragment: B::Shader,
}

/// Compiles both stages and attaches them to a fresh program object.
///
/// Stops at the first failing stage and releases everything created so far.
pub fn compile<B: GlBackend>(
    gl: &B,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<CompiledProgram<B>, ShaderError> {
    let program = gl.create_program().map_err(|reason| {
        log::error!("Error creating shader program: {}", reason);
        ShaderError::Create { what: "program", reason }
    })?;

    let vertex = match compile_stage(gl, ShaderStage::Vertex, vertex_source) {
        Ok(shader) => shader,
        Err(err) => {
            gl.delete_program(program);
            return Err(err);
        }
    };
    gl.attach_shader(program, vertex);

    let fragment = match compile_stage(gl, ShaderStage::Fragment, fragment_source) {
        Ok(shader) => shader,
        Err(err) => {
            gl.detach_shader(program, vertex);
            gl.delete_shader(vertex);
            gl.delete_program(program);
            return Err(err);
        }
    };
    gl.attach_shader(program, fragment);

    Ok(CompiledProgram { program, vertex, fragment })
}

impl<B: GlBackend> CompiledProgram<B> {
    /// Links the program, validates it and resolves the `model` and
    /// `projection` uniforms.
    ///
    /// Validation failure is logged and does not fail the link.
    pub fn link(self, gl: &B) -> Result<ShaderProgram<B>, ShaderError> {
        let program = self.program;
        gl.link_program(program);
        let linked = gl.get_program_link_status(program);
        let link_log = (!linked).then(|| bounded_log(gl.get_program_info_log(program)));

        for shader in [self.vertex, self.fragment] {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        if let Some(log) = link_log {
            log::error!("Error linking program: '{}'", log);
            gl.delete_program(program);
            return Err(ShaderError::Link { log });
        }

        gl.validate_program(program);
        if !gl.get_program_validate_status(program) {
            let log = bounded_log(gl.get_program_info_log(program));
            log::warn!("Error validating program: '{}'", log);
        }

        let locations = ParamLocations {
            model: resolve(gl, program, MODEL_UNIFORM),
            projection: resolve(gl, program, PROJECTION_UNIFORM),
        };

        log::debug!("shader program linked: {:?}", program);
        Ok(ShaderProgram { program, locations })
    }
}

fn resolve<B: GlBackend>(gl: &B, program: B::Program, name: &str) -> Option<B::UniformLocation> {
    let location = gl.get_uniform_location(program, name);
    if location.is_none() {
        log::warn!("uniform '{}' not found in program {:?}", name, program);
    }
    location
}

/// A linked program and the locations of its external parameters.
pub struct ShaderProgram<B: GlBackend> {
    program: B::Program,
    locations: ParamLocations<B::UniformLocation>,
}

impl<B: GlBackend> ShaderProgram<B> {
    /// Shorthand for [`compile`] followed by [`CompiledProgram::link`].
    pub fn build(gl: &B, vertex_source: &str, fragment_source: &str) -> Result<Self, ShaderError> {
        compile(gl, vertex_source, fragment_source)?.link(gl)
    }

    pub fn handle(&self) -> B::Program {
        self.program
    }

    pub fn locations(&self) -> &ParamLocations<B::UniformLocation> {
        &self.locations
    }

    pub fn bind(&self, gl: &B) {
        gl.use_program(Some(self.program));
    }

    pub fn unbind(&self, gl: &B) {
        gl.use_program(None);
    }

    /// Uploads a column-major matrix. Returns `false` without touching the
    /// backend when the parameter was not resolved at link time.
    pub fn set_matrix(&self, gl: &B, param: Param, matrix: &[f32; 16]) -> bool {
        match self.locations.get(param) {
            Some(location) => {
                gl.uniform_matrix_4_f32_slice(location, false, matrix);
                true
            }
            None => false,
        }
    }

    pub fn destroy(self, gl: &B) {
        gl.delete_program(self.program);
    }
}
