pub mod frame_renderer;
pub mod shaders;

pub use frame_renderer::RenderContext;
