//! OpenGL Shaders
//!
//! This module defines the [`ShaderProgram`] struct for building and using OpenGL shader
//! programs one stage at a time, and the [`ShaderError`] describing what went wrong.

use std::{fmt, sync::Arc};

use super::Gl;

/// A programmable pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// The GL enum for this stage's shader type.
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

/// Errors reported while building a shader program.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShaderError {
    /// The GL layer refused to allocate a shader or program object.
    #[error("ERROR::SHADER::CREATION_FAILED\n{0}")]
    Create(String),
    /// A stage failed to compile. The broken stage is still attached.
    #[error("ERROR::SHADER::COMPILATION_FAILED ({stage})\n{log}")]
    Compile { stage: ShaderStage, log: String },
    /// The program failed to link.
    #[error("ERROR::SHADER::PROGRAM::LINKING_FAILED\n{0}")]
    Link(String),
}

/// Represents an OpenGL shader program, assembled from individually compiled stages.
pub struct ShaderProgram<G: Gl> {
    gl: Arc<G>,
    id: G::Program,
    linked: bool,
}

impl<G: Gl> ShaderProgram<G> {
    /// Allocates an empty shader program.
    pub fn new(gl: &Arc<G>) -> Result<Self, ShaderError> {
        let id = gl.create_program().map_err(ShaderError::Create)?;

        Ok(Self {
            gl: Arc::clone(gl),
            id,
            linked: false,
        })
    }

    /// Compiles `source` as a `stage` shader and attaches it to the program.
    ///
    /// The shader is attached even when it fails to compile, in which case the compile log is
    /// returned and the program will fail to link later.
    pub fn attach(&mut self, stage: ShaderStage, source: &str) -> Result<(), ShaderError> {
        let shader = self
            .gl
            .create_shader(stage.gl_type())
            .map_err(ShaderError::Create)?;
        self.gl.shader_source(shader, source);
        self.gl.compile_shader(shader);

        let result = if self.gl.get_shader_compile_status(shader) {
            Ok(())
        } else {
            Err(ShaderError::Compile {
                stage,
                log: self.gl.get_shader_info_log(shader),
            })
        };

        self.gl.attach_shader(self.id, shader);
        self.gl.delete_shader(shader);

        result
    }

    /// Binds `output_name` to fragment output 0 and links the program.
    pub fn link(&mut self, output_name: &str) -> Result<(), ShaderError> {
        self.gl.bind_frag_data_location(self.id, 0, output_name);
        self.gl.link_program(self.id);

        self.linked = self.gl.get_program_link_status(self.id);
        if !self.linked {
            return Err(ShaderError::Link(self.gl.get_program_info_log(self.id)));
        }

        log::trace!("linked shader program {:?}", self.id);
        Ok(())
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        self.gl.use_program(Some(self.id));
    }

    /// Whether the last call to [`ShaderProgram::link`] succeeded.
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    #[cfg(test)]
    pub fn id(&self) -> G::Program {
        self.id
    }
}

impl<G: Gl> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        log::trace!("releasing shader program {:?}", self.id);
        self.gl.delete_program(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abs::fake::{Call, RecordingGl};

    const VERT: &str = "#version 330 core\nlayout(location = 0) in vec3 position;\nvoid main() { gl_Position = vec4(position, 1.0); }";
    const FRAG: &str = "#version 330 core\nout vec4 color;\nvoid main() { color = vec4(1.0); }";
    const BROKEN_VERT: &str = "#version 330 core\nvoid main() { gl_Position = vec4(1.0;";

    #[test]
    fn test_valid_stages_link() {
        let gl = Arc::new(RecordingGl::new());
        let mut program = ShaderProgram::new(&gl).unwrap();

        assert_eq!(program.attach(ShaderStage::Vertex, VERT), Ok(()));
        assert_eq!(program.attach(ShaderStage::Fragment, FRAG), Ok(()));
        assert!(!program.is_linked());
        assert_eq!(program.link("color"), Ok(()));
        assert!(program.is_linked());

        assert!(gl.calls().contains(&Call::BindFragDataLocation {
            program: program.id(),
            color_number: 0,
            name: "color".to_owned(),
        }));
    }

    #[test]
    fn test_compile_failure_still_attaches_and_link_fails() {
        let gl = Arc::new(RecordingGl::new());
        let mut program = ShaderProgram::new(&gl).unwrap();

        let err = program.attach(ShaderStage::Vertex, BROKEN_VERT).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
        assert!(err.to_string().starts_with("ERROR::SHADER::COMPILATION_FAILED"));
        assert_eq!(
            gl.count(|c| matches!(c, Call::AttachShader { program: p, .. } if *p == program.id())),
            1
        );

        assert_eq!(program.attach(ShaderStage::Fragment, FRAG), Ok(()));
        let err = program.link("color").unwrap_err();
        assert!(matches!(err, ShaderError::Link(_)));
        assert!(err
            .to_string()
            .starts_with("ERROR::SHADER::PROGRAM::LINKING_FAILED"));
        assert!(!program.is_linked());
    }

    #[test]
    fn test_standalone_shaders_are_deleted_after_attach() {
        let gl = Arc::new(RecordingGl::new());
        let mut program = ShaderProgram::new(&gl).unwrap();
        program.attach(ShaderStage::Vertex, VERT).unwrap();
        program.attach(ShaderStage::Fragment, FRAG).unwrap();

        let calls = gl.calls();
        let created: Vec<u32> = calls
            .iter()
            .filter_map(|c| match c {
                Call::CreateShader { shader, .. } => Some(*shader),
                _ => None,
            })
            .collect();
        assert_eq!(created.len(), 2);
        for shader in created {
            assert!(calls.contains(&Call::DeleteShader(shader)));
        }
    }

    #[test]
    fn test_drop_releases_program_once() {
        let gl = Arc::new(RecordingGl::new());
        let program = ShaderProgram::new(&gl).unwrap();
        let id = program.id();
        let moved = program;
        drop(moved);

        assert_eq!(gl.count(|c| *c == Call::DeleteProgram(id)), 1);
    }
}
