//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

/// Errors that prevent a window with a usable GL context from being created.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to initialize SDL: {0}")]
    Sdl(String),
    #[error("Failed to create window: {0}")]
    Window(String),
    #[error("Failed to create OpenGL context: {0}")]
    Context(String),
    #[error("Failed to initialize GL loader: {0}")]
    Loader(String),
    #[error("Failed to create shader program: {0}")]
    Shader(#[from] crate::abs::ShaderError),
    #[error("Failed to create geometry: {0}")]
    Geometry(String),
    #[error("cannot {0} in state {1:?}")]
    InvalidState(&'static str, crate::application::AppState),
}

/// Requested OpenGL context.
#[derive(Clone, Copy, Debug)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
    close_requested: bool,
}

impl App {
    /// Creates a new fixed-size [`App`] window with a core, forward-compatible GL context of the
    /// given version made current on this thread.
    ///
    /// A GL loader that cannot resolve core entry points is logged but not treated as fatal.
    pub fn new(title: &str, width: u32, height: u32, version: GlVersion) -> Result<Self, AppError> {
        let sdl = sdl2::init().map_err(AppError::Sdl)?;
        let video_subsystem = sdl.video().map_err(AppError::Sdl)?;

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(version.major, version.minor);
        gl_attr.set_context_flags().forward_compatible().set();

        let window = video_subsystem
            .window(title, width, height)
            .opengl()
            .build()
            .map_err(|e| AppError::Window(e.to_string()))?;
        let gl_context = window.gl_create_context().map_err(AppError::Context)?;
        window
            .gl_make_current(&gl_context)
            .map_err(AppError::Context)?;
        log::trace!(
            "created {width}x{height} window with GL {}.{} core context",
            version.major,
            version.minor
        );

        if video_subsystem
            .gl_get_proc_address("glCreateProgram")
            .is_null()
        {
            log::error!(
                "{}",
                AppError::Loader("glCreateProgram could not be resolved".to_owned())
            );
        }
        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump().map_err(AppError::Sdl)?;
        let gl = Arc::new(gl);

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl,
            event_pump,
            close_requested: false,
        })
    }
}

/// The window side of the frame loop.
pub trait Surface {
    /// Whether the window has been asked to close.
    fn should_close(&self) -> bool;

    /// Presents the back buffer.
    fn swap_buffers(&self);

    /// Processes pending window events, possibly setting the close flag.
    fn poll_events(&mut self);

    /// Sets the close flag as if the user had closed the window.
    fn request_close(&mut self);
}

impl Surface for App {
    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn swap_buffers(&self) {
        self.window.gl_swap_window();
    }

    fn poll_events(&mut self) {
        let events: Vec<_> = self.event_pump.poll_iter().collect();
        for event in events {
            match event {
                sdl2::event::Event::Quit { .. }
                | sdl2::event::Event::Window {
                    win_event: sdl2::event::WindowEvent::Close,
                    ..
                } => self.request_close(),
                _ => {}
            }
        }
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }
}
