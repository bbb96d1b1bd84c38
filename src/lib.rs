pub mod cli;
pub mod config;
pub mod logging;
pub mod recorder;
pub mod sourcemap;
pub mod trace;
pub mod ui;
use miette::Diagnostic;

pub use recorder::{ChangeRecorder, StateChangeRecord, StateValue};
pub use sourcemap::SourceMapResolver;

/// Result type alias for the tracer
pub type Result<T> = miette::Result<T>;

/// Error types for the tracer
#[derive(Debug, Clone, thiserror::Error, Diagnostic)]
pub enum TracerError {
    #[error("Failed to fetch source map: {0}")]
    #[diagnostic(
        code(tracer::map_fetch_failed),
        help("Make sure the bundle is served with its `.map` file next to it and that the server allows the request.")
    )]
    MapFetchError(String),

    #[error("Failed to parse source map: {0}")]
    #[diagnostic(
        code(tracer::map_parse_failed),
        help("Only revision 3 source maps are supported. Check that the bundler emits plain JSON source maps.")
    )]
    MapParseError(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(tracer::config_error),
        help("Check `.state-trace.toml` and the STATE_TRACE_* environment variables.")
    )]
    ConfigError(String),

    #[error("File operation failed: {0}")]
    #[diagnostic(
        code(tracer::file_error),
        help("Check if you have necessary permissions and that the path exists.")
    )]
    FileError(String),

    #[error("Invalid value: {0}")]
    #[diagnostic(
        code(tracer::invalid_value),
        help("State values are given as JSON, e.g. --from 1 --to '\"hello\"'.")
    )]
    InvalidValue(String),
}
