//! The application lifecycle: window bootstrap, scene setup and the frame loop.

use std::time::Instant;

use crate::{
    abs::{App, AppError, Gl, GlVersion, Surface},
    render::Scene,
};

pub const WIDTH: u32 = 640;
pub const HEIGHT: u32 = 480;
pub const TITLE: &str = "OpenGL Basic 1";
pub const GL_VERSION: GlVersion = GlVersion { major: 3, minor: 3 };

/// Lifecycle of an [`Application`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    Constructed,
    Initialized,
    Running,
    Terminated,
}

pub struct Application {
    state: AppState,
    // Declared before `app` so GPU objects are released while the context is still alive.
    scene: Option<Scene<glow::Context>>,
    app: Option<App>,
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl Application {
    pub fn new() -> Self {
        Self {
            state: AppState::Constructed,
            scene: None,
            app: None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> AppState {
        self.state
    }

    /// Opens the window, sets up GL state, compiles the shaders and uploads the geometry.
    pub fn init(&mut self) -> Result<(), AppError> {
        if self.state != AppState::Constructed {
            return Err(AppError::InvalidState("init", self.state));
        }

        let app = App::new(TITLE, WIDTH, HEIGHT, GL_VERSION)?;
        let scene = Scene::new(&app.gl, WIDTH, HEIGHT)?;
        if !scene.is_ready() {
            log::warn!("continuing with shader programs that failed to link");
        }

        self.app = Some(app);
        self.scene = Some(scene);
        self.state = AppState::Initialized;
        log::trace!("initialized {TITLE}");
        Ok(())
    }

    /// Runs the frame loop until the window is closed. Returns the process status.
    pub fn run(&mut self) -> i32 {
        let (Some(app), Some(scene), AppState::Initialized) =
            (self.app.as_mut(), self.scene.as_ref(), self.state)
        else {
            log::error!("{}", AppError::InvalidState("run", self.state));
            return 1;
        };

        self.state = AppState::Running;
        let status = run_loop(app, scene);
        self.state = AppState::Terminated;
        log::trace!("window closed");
        status
    }
}

/// Renders, presents and polls until `surface` reports a close request. Returns 0.
pub fn run_loop<S: Surface, G: Gl>(surface: &mut S, scene: &Scene<G>) -> i32 {
    let mut last = Instant::now();
    while !surface.should_close() {
        // Frame timing is sampled but nothing animates yet.
        let now = Instant::now();
        let _delta_time = now.duration_since(last).as_secs_f32();
        last = now;

        scene.render();

        surface.swap_buffers();
        surface.poll_events();
    }

    0
}
