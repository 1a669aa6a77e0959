pub mod animation_state;
pub mod mesh;
pub mod shader_program;

pub use animation_state::AnimationState;
pub use mesh::{GpuMesh, Mesh};
pub use shader_program::{ShaderProgram, ShaderStage};
