//! The two-triangle scene: render state, shader programs and the shared triangle mesh.

use std::sync::Arc;

use crate::{
    abs::{AppError, Gl, Mesh, ShaderError, ShaderProgram, ShaderStage},
    logging::SHADER_COMPILE_TARGET,
};

/// Shifts the triangle by `+0.1` on X.
pub const VERTEX_SHADER_RIGHT: &str = include_str!("shaders/triangle_right.vert.glsl");
/// Shifts the triangle by `-0.1` on X.
pub const VERTEX_SHADER_LEFT: &str = include_str!("shaders/triangle_left.vert.glsl");
/// Colors a fragment by the absolute value of its interpolated position.
pub const FRAGMENT_SHADER: &str = include_str!("shaders/triangle.frag.glsl");

/// Name of the fragment shader output bound to draw buffer 0.
pub const FRAGMENT_OUTPUT: &str = "color";

pub const CLEAR_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Everything drawn each frame. Owns its GPU objects exclusively.
pub struct Scene<G: Gl> {
    gl: Arc<G>,
    /// Drawn in order: right-shifted first, then left-shifted.
    programs: [ShaderProgram<G>; 2],
    triangle: Mesh<G>,
}

impl<G: Gl> Scene<G> {
    /// Sets up render state, compiles both programs and uploads the triangle, in that order.
    ///
    /// Compile and link failures are logged and the scene is still built. Only a GL layer that
    /// refuses to hand out objects is an error.
    pub fn new(gl: &Arc<G>, width: u32, height: u32) -> Result<Self, AppError> {
        setup_render_state(&**gl, width, height);

        let programs = [
            build_program(gl, VERTEX_SHADER_RIGHT, FRAGMENT_SHADER)?,
            build_program(gl, VERTEX_SHADER_LEFT, FRAGMENT_SHADER)?,
        ];

        let triangle = Mesh::triangle(gl).map_err(AppError::Geometry)?;

        Ok(Self {
            gl: Arc::clone(gl),
            programs,
            triangle,
        })
    }

    /// Clears the framebuffer and draws the triangle once per program.
    pub fn render(&self) {
        self.gl
            .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        for program in &self.programs {
            program.use_program();
            self.triangle.draw();
        }
    }

    /// Whether both programs linked.
    pub fn is_ready(&self) -> bool {
        self.programs.iter().all(ShaderProgram::is_linked)
    }

    #[cfg(test)]
    pub fn programs(&self) -> &[ShaderProgram<G>; 2] {
        &self.programs
    }

    #[cfg(test)]
    pub fn triangle(&self) -> &Mesh<G> {
        &self.triangle
    }
}

/// Viewport covering the window, standard alpha blending and the grey clear color.
fn setup_render_state<G: Gl>(gl: &G, width: u32, height: u32) {
    gl.viewport(0, 0, width as i32, height as i32);
    gl.enable(glow::BLEND);
    gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
    let [r, g, b, a] = CLEAR_COLOR;
    gl.clear_color(r, g, b, a);
}

/// Builds a program from a vertex and a fragment source, logging compile and link failures.
fn build_program<G: Gl>(
    gl: &Arc<G>,
    vertex: &str,
    fragment: &str,
) -> Result<ShaderProgram<G>, ShaderError> {
    let mut program = ShaderProgram::new(gl)?;

    for (stage, source) in [
        (ShaderStage::Vertex, vertex),
        (ShaderStage::Fragment, fragment),
    ] {
        match program.attach(stage, source) {
            Ok(()) => {}
            Err(err @ ShaderError::Compile { .. }) => {
                log::error!(target: SHADER_COMPILE_TARGET, "{err}")
            }
            Err(err) => return Err(err),
        }
    }

    if let Err(err) = program.link(FRAGMENT_OUTPUT) {
        log::error!("{err}");
    }

    Ok(program)
}
