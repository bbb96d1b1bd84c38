pub mod args;
pub mod commands;

pub use args::{AnnotateArgs, Cli, Commands, CompletionsArgs, OutputFormat, Verbosity};
