//! This module contains the thin OpenGL abstractions used by the demo:
//! window and context setup, shader programs and meshes.

pub mod app;
pub mod gl;
pub mod mesh;
pub mod shader;

pub use app::*;
#[cfg(test)]
pub use gl::fake;
pub use gl::Gl;
pub use mesh::*;
pub use shader::*;
