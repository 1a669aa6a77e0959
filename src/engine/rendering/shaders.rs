//! GLSL 330 sources for the pyramid program.

pub const VERTEX_SHADER_SOURCE: &str = include_str!("../../assets/shaders/pyramid_vertex.glsl");
pub const FRAGMENT_SHADER_SOURCE: &str = include_str!("../../assets/shaders/pyramid_fragment.glsl");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stage_declares_position_and_both_matrices() {
        assert!(VERTEX_SHADER_SOURCE.starts_with("#version 330"));
        assert!(VERTEX_SHADER_SOURCE.contains("layout (location = 0) in vec3 pos;"));
        assert!(VERTEX_SHADER_SOURCE.contains("uniform mat4 model;"));
        assert!(VERTEX_SHADER_SOURCE.contains("uniform mat4 projection;"));
    }

    #[test]
    fn fragment_stage_passes_color_through() {
        assert!(FRAGMENT_SHADER_SOURCE.starts_with("#version 330"));
        assert!(FRAGMENT_SHADER_SOURCE.contains("colour = vecColor;"));
    }
}
