use crate::config::Config;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "state-trace")]
#[command(about = "Source-mapped stack traces for state changes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            return Verbosity::Quiet;
        }
        match self.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            2 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Annotate a raw stack trace as one recorded state change
    Annotate(AnnotateArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser)]
pub struct AnnotateArgs {
    /// File holding the raw stack trace, or `-` to read stdin
    #[arg(short, long)]
    pub trace: PathBuf,

    /// Previous value as JSON. Omit for an initial value
    #[arg(long)]
    pub from: Option<String>,

    /// New value as JSON
    #[arg(long, default_value = "null")]
    pub to: String,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Frame name of the function that reports state changes
    #[arg(long)]
    pub entry_frame: Option<String>,

    /// Frame name of the framework dispatch machinery
    #[arg(long)]
    pub dispatch_frame: Option<String>,

    /// Placeholder used when the state's binding name cannot be found
    #[arg(long)]
    pub default_prop_name: Option<String>,
}

impl AnnotateArgs {
    /// Fill unset options from the loaded configuration
    pub fn merge_config(&mut self, config: &Config) {
        if self.entry_frame.is_none() {
            self.entry_frame = Some(config.trace.entry_frame.clone());
        }
        if self.dispatch_frame.is_none() {
            self.dispatch_frame = Some(config.trace.dispatch_frame.clone());
        }
        if self.default_prop_name.is_none() {
            self.default_prop_name = Some(config.trace.default_prop_name.clone());
        }
        if self.format.is_none() {
            self.format = match config.output.format.as_deref() {
                Some("json") => Some(OutputFormat::Json),
                Some("text") => Some(OutputFormat::Text),
                _ => None,
            };
        }
    }
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn to_log_level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotate_args(argv: &[&str]) -> AnnotateArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Annotate(args) => args,
            Commands::Completions(_) => panic!("expected annotate"),
        }
    }

    #[test]
    fn test_merge_config_keeps_flags_and_fills_the_rest() {
        let mut config = Config::default();
        config.trace.default_prop_name = "<config>".to_string();
        config.trace.dispatch_frame = "commitUpdate".to_string();
        config.output.format = Some("json".to_string());

        let mut args = annotate_args(&[
            "state-trace",
            "annotate",
            "--trace",
            "t.txt",
            "--default-prop-name",
            "<flag>",
        ]);
        args.merge_config(&config);

        assert_eq!(args.default_prop_name.as_deref(), Some("<flag>"));
        assert_eq!(args.dispatch_frame.as_deref(), Some("commitUpdate"));
        assert_eq!(args.entry_frame.as_deref(), Some("useDebuggableState"));
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_verbosity_flags() {
        let quiet = Cli::try_parse_from(["state-trace", "-q", "completions", "bash"]).unwrap();
        assert_eq!(quiet.verbosity(), Verbosity::Quiet);

        let debug = Cli::try_parse_from(["state-trace", "-vv", "completions", "bash"]).unwrap();
        assert_eq!(debug.verbosity().to_log_level(), "debug");
    }
}
