use thiserror::Error;

use crate::engine::backend::GlBackend;

/// Attribute slot the vertex shader reads positions from.
pub const POSITION_ATTRIBUTE: u32 = 0;

const FLOATS_PER_VERTEX: i32 = 3;

#[derive(Error, Debug, PartialEq)]
pub enum GeometryError {
    #[error("Triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("Failed to allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },
}

fn alloc_err(what: &'static str) -> impl FnOnce(String) -> GeometryError {
    move |reason| GeometryError::Allocation { what, reason }
}

/// CPU-side mesh: positions plus triangle index triples.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<[f32; 3]>,
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new(vertices: Vec<[f32; 3]>, triangles: Vec<[u32; 3]>) -> Result<Self, GeometryError> {
        let vertex_count = vertices.len();
        for (triangle, indices) in triangles.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(GeometryError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(Self { vertices, triangles })
    }

    /// Apex at +Y over a unit square base in the XZ plane.
    pub fn pyramid() -> Self {
        Self {
            vertices: vec![
                [0.0, 1.0, 0.0],
                [0.5, 0.0, 0.5],
                [-0.5, 0.0, 0.5],
                [-0.5, 0.0, -0.5],
                [0.5, 0.0, -0.5],
            ],
            triangles: vec![
                [0, 1, 4],
                [0, 2, 1],
                [0, 3, 2],
                [0, 4, 3],
                [1, 3, 2],
                [1, 4, 3],
            ],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn index_count(&self) -> usize {
        self.triangles.len() * 3
    }
}

/// GPU-side handles for an uploaded [`Mesh`].
///
/// The index buffer is not captured by the array object; bind both before
/// drawing (see [`GpuMesh::bind`]).
pub struct GpuMesh<B: GlBackend> {
    vao: B::VertexArray,
    vbo: B::Buffer,
    ibo: B::Buffer,
    index_count: i32,
}

impl<B: GlBackend> GpuMesh<B> {
    /// Uploads `mesh` into immutable buffers and records the position layout
    /// at [`POSITION_ATTRIBUTE`]. Leaves nothing bound on return.
    ///
    /// On an allocation failure, every handle created so far is deleted.
    pub fn create(gl: &B, mesh: &Mesh) -> Result<Self, GeometryError> {
        let ibo = gl.create_buffer().map_err(alloc_err("index buffer"))?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(&mesh.triangles),
            glow::STATIC_DRAW,
        );

        let vao = match gl.create_vertex_array() {
            Ok(vao) => vao,
            Err(reason) => {
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
                gl.delete_buffer(ibo);
                return Err(alloc_err("vertex array")(reason));
            }
        };
        gl.bind_vertex_array(Some(vao));

        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(reason) => {
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
                gl.bind_vertex_array(None);
                gl.delete_vertex_array(vao);
                gl.delete_buffer(ibo);
                return Err(alloc_err("vertex buffer")(reason));
            }
        };
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&mesh.vertices),
            glow::STATIC_DRAW,
        );

        // Stride 0: tightly packed positions.
        gl.vertex_attrib_pointer_f32(POSITION_ATTRIBUTE, FLOATS_PER_VERTEX, glow::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(POSITION_ATTRIBUTE);

        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);

        log::debug!(
            "uploaded mesh: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        Ok(Self {
            vao,
            vbo,
            ibo,
            index_count: mesh.index_count() as i32,
        })
    }

    pub fn index_count(&self) -> i32 {
        self.index_count
    }

    pub fn bind(&self, gl: &B) {
        gl.bind_vertex_array(Some(self.vao));
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.ibo));
    }

    pub fn unbind(&self, gl: &B) {
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);
    }

    pub fn draw(&self, gl: &B) {
        gl.draw_elements(glow::TRIANGLES, self.index_count, glow::UNSIGNED_INT, 0);
    }

    pub fn destroy(self, gl: &B) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
        gl.delete_buffer(self.ibo);
    }
}
