use std::process::ExitCode;

use crate::application::Application;

mod abs;
mod application;
mod logging;
mod render;

fn main() -> ExitCode {
    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logger: {e}");
    }

    let status = {
        let mut application = Application::new();
        if let Err(e) = application.init() {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
        application.run()
    };

    u8::try_from(status).map_or(ExitCode::FAILURE, ExitCode::from)
}
