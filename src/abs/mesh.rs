//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing vertex data on the GPU side.
//! Vertices should implement the [`Vertex`] trait.

use std::sync::Arc;

use glam::Vec3;

use super::Gl;

/// Trait that defines the necessary methods for a vertex.
pub trait Vertex {
    /// Sets up the vertex attribute pointers for the vertex.
    fn vertex_attribs<G: Gl>(gl: &G);
}

/// A vertex carrying only a position, read by shaders from attribute location 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionVertex {
    pub position: Vec3,
}

impl PositionVertex {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
        }
    }
}

impl Vertex for PositionVertex {
    fn vertex_attribs<G: Gl>(gl: &G) {
        let stride = std::mem::size_of::<PositionVertex>() as i32;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
    }
}

/// The triangle drawn by the demo: flat base, apex pointing up.
pub const TRIANGLE: [PositionVertex; 3] = [
    PositionVertex::new(-1.0, -1.0, 0.0),
    PositionVertex::new(0.0, 1.0, 0.0),
    PositionVertex::new(1.0, -1.0, 0.0),
];

/// Represents a non-indexed mesh stored on the GPU side.
///
/// Owns one vertex array and one vertex buffer; both are deleted when the mesh is dropped.
pub struct Mesh<G: Gl> {
    gl: Arc<G>,
    draw_mode: u32,
    vao: G::VertexArray,
    vbo: G::Buffer,
    vertex_count: usize,
}

impl<G: Gl> Mesh<G> {
    /// Uploads `vertices` into a fresh vertex array / buffer pair.
    pub fn new<V: Vertex>(gl: &Arc<G>, vertices: &[V], draw_mode: u32) -> Result<Self, String> {
        let vao = gl.create_vertex_array()?;
        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(e) => {
                gl.delete_vertex_array(vao);
                return Err(e);
            }
        };

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        // SAFETY: vertex types are `#[repr(C)]` plain floats, so viewing them as bytes is sound.
        let bytes = unsafe {
            std::slice::from_raw_parts(
                vertices.as_ptr() as *const u8,
                std::mem::size_of_val(vertices),
            )
        };
        gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW);

        V::vertex_attribs(&**gl);

        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);

        log::trace!("uploaded mesh {vao:?}/{vbo:?} with {} vertices", vertices.len());

        Ok(Self {
            gl: Arc::clone(gl),
            draw_mode,
            vao,
            vbo,
            vertex_count: vertices.len(),
        })
    }

    /// Creates the demo triangle as a 3-vertex triangle strip.
    pub fn triangle(gl: &Arc<G>) -> Result<Self, String> {
        Self::new(gl, &TRIANGLE, glow::TRIANGLE_STRIP)
    }

    /// Draws the mesh. The mesh's vertex array stays bound afterwards.
    pub fn draw(&self) {
        self.gl.bind_vertex_array(Some(self.vao));
        self.gl
            .draw_arrays(self.draw_mode, 0, self.vertex_count as i32);
    }

    /// Returns the amount of vertices in the mesh.
    #[cfg(test)]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// The GPU vertex array backing this mesh.
    #[cfg(test)]
    pub fn vertex_array(&self) -> G::VertexArray {
        self.vao
    }
}

impl<G: Gl> Drop for Mesh<G> {
    fn drop(&mut self) {
        log::trace!("releasing mesh {:?}/{:?}", self.vao, self.vbo);
        self.gl.delete_buffer(self.vbo);
        self.gl.delete_vertex_array(self.vao);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abs::fake::{Call, RecordingGl};

    #[test]
    fn test_triangle_upload_layout() {
        let gl = Arc::new(RecordingGl::new());
        let mesh = Mesh::triangle(&gl).unwrap();
        assert_eq!(mesh.vertex_count(), 3);

        let calls = gl.calls();
        assert!(calls.contains(&Call::BufferData {
            target: glow::ARRAY_BUFFER,
            len: 9 * std::mem::size_of::<f32>(),
            usage: glow::STATIC_DRAW,
        }));
        assert!(calls.contains(&Call::EnableVertexAttribArray(0)));
        assert!(calls.contains(&Call::VertexAttribPointer {
            index: 0,
            size: 3,
            data_type: glow::FLOAT,
            normalized: false,
            stride: 12,
            offset: 0,
        }));
    }

    #[test]
    fn test_draw_is_one_strip_of_three_every_time() {
        let gl = Arc::new(RecordingGl::new());
        let mesh = Mesh::triangle(&gl).unwrap();
        gl.clear_calls();

        for _ in 0..3 {
            mesh.draw();
        }

        let vao = mesh.vertex_array();
        let expected: Vec<Call> = std::iter::repeat_n(
            [
                Call::BindVertexArray(Some(vao)),
                Call::DrawArrays {
                    mode: glow::TRIANGLE_STRIP,
                    first: 0,
                    count: 3,
                },
            ],
            3,
        )
        .flatten()
        .collect();
        assert_eq!(gl.calls(), expected);
    }

    #[test]
    fn test_drop_releases_buffer_then_array_once() {
        let gl = Arc::new(RecordingGl::new());
        let mesh = Mesh::triangle(&gl).unwrap();
        let vao = mesh.vertex_array();
        // Moving must not release anything.
        let moved = mesh;
        gl.clear_calls();
        drop(moved);

        let calls = gl.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], Call::DeleteBuffer(_)));
        assert_eq!(calls[1], Call::DeleteVertexArray(vao));
    }
}
