//! Logger setup.
//!
//! Shader compile diagnostics and routine messages go to stdout. Other warnings and errors
//! (link failures, window and loader problems) go to stderr. Error lines are written bare so
//! they start with their fixed prefix.

use log::{Level, LevelFilter, Metadata};

/// Log target for shader compile diagnostics.
pub const SHADER_COMPILE_TARGET: &str = "shader::compile";

/// Whether a record belongs on stdout rather than stderr.
pub fn routes_to_stdout(metadata: &Metadata) -> bool {
    metadata.target() == SHADER_COMPILE_TARGET || metadata.level() > Level::Warn
}

/// Whether a record is written without the timestamp/level/target header.
pub fn is_bare(metadata: &Metadata) -> bool {
    metadata.level() == Level::Error
}

/// Installs the global logger.
pub fn init() -> Result<(), log::SetLoggerError> {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            if is_bare(record.metadata()) {
                out.finish(format_args!("{message}"))
            } else {
                out.finish(format_args!(
                    "[{} {} {}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            }
        })
        .level(level)
        .chain(
            fern::Dispatch::new()
                .filter(routes_to_stdout)
                .chain(std::io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .filter(|metadata| !routes_to_stdout(metadata))
                .chain(std::io::stderr()),
        )
        .apply()
}
