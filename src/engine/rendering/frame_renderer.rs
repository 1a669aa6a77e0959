use glam::Mat4;

use crate::engine::backend::GlBackend;
use crate::engine::components::animation_state::AnimationState;
use crate::engine::components::mesh::{GpuMesh, Mesh};
use crate::engine::components::shader_program::{Param, ShaderProgram};
use crate::engine::config::DemoConfig;
use crate::engine::error::DemoResult;
use crate::engine::rendering::shaders::{FRAGMENT_SHADER_SOURCE, VERTEX_SHADER_SOURCE};
use crate::engine::utils::math::{aspect_ratio, model_matrix, projection_matrix};

const HEARTBEAT_FRAMES: u64 = 600;

/// Everything one frame needs: the uploaded mesh, the linked program, the
/// animation and the fixed projection.
pub struct RenderContext<B: GlBackend> {
    mesh: GpuMesh<B>,
    program: ShaderProgram<B>,
    animation: AnimationState,
    projection: Mat4,
    clear_color: [f32; 4],
    frames_rendered: u64,
}

impl<B: GlBackend> RenderContext<B> {
    /// One-time setup after the context is current: depth test, viewport,
    /// mesh upload, program build and projection.
    pub fn new(gl: &B, config: &DemoConfig, framebuffer: (u32, u32)) -> DemoResult<Self> {
        let (width, height) = framebuffer;
        gl.enable(glow::DEPTH_TEST);
        gl.viewport(0, 0, width as i32, height as i32);

        let mesh = GpuMesh::create(gl, &Mesh::pyramid())?;
        let program = match ShaderProgram::build(gl, VERTEX_SHADER_SOURCE, FRAGMENT_SHADER_SOURCE) {
            Ok(program) => program,
            Err(err) => {
                mesh.destroy(gl);
                return Err(err.into());
            }
        };

        let projection = projection_matrix(&config.projection, aspect_ratio(width, height));
        log::info!("render context ready ({}x{} framebuffer)", width, height);

        Ok(Self::from_parts(mesh, program, projection, config.clear_color))
    }

    pub fn from_parts(
        mesh: GpuMesh<B>,
        program: ShaderProgram<B>,
        projection: Mat4,
        clear_color: [f32; 4],
    ) -> Self {
        Self {
            mesh,
            program,
            animation: AnimationState::new(),
            projection,
            clear_color,
            frames_rendered: 0,
        }
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Advances the animation and draws one complete frame.
    ///
    /// Nothing stays bound when this returns.
    pub fn render_frame(&mut self, gl: &B) {
        self.animation.advance();

        let [r, g, b, a] = self.clear_color;
        gl.clear_color(r, g, b, a);
        gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        self.program.bind(gl);

        let model = model_matrix(self.animation.offset(), self.animation.angle.radians());
        self.program.set_matrix(gl, Param::Model, &model.to_cols_array());
        self.program.set_matrix(gl, Param::Projection, &self.projection.to_cols_array());

        self.mesh.bind(gl);
        self.mesh.draw(gl);
        self.mesh.unbind(gl);

        self.program.unbind(gl);

        self.frames_rendered += 1;
        if self.frames_rendered % HEARTBEAT_FRAMES == 0 {
            log::debug!(
                "frame {}: offset={:.3} angle={:.2}",
                self.frames_rendered,
                self.animation.offset(),
                self.animation.angle_degrees()
            );
        }
        log::trace!("frame {} submitted", self.frames_rendered);
    }

    /// Releases the program, buffers and array object.
    pub fn destroy(self, gl: &B) {
        self.program.destroy(gl);
        self.mesh.destroy(gl);
        log::debug!("render context destroyed after {} frames", self.frames_rendered);
    }
}
