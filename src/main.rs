use clap::{CommandFactory, Parser};
use clap_complete::generate;
use state_tracer::cli::{Cli, Commands, Verbosity};
use state_tracer::ui::formatter::Formatter;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing(verbosity: Verbosity) {
    let log_level = verbosity.to_log_level();
    let fallback_filter = format!("state_tracer={}", log_level);

    let use_json = std::env::var("STATE_TRACE_JSON").is_ok();

    if use_json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| fallback_filter.clone().into()),
            )
            .with(json_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| fallback_filter.into()),
            )
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    Formatter::configure_colors_from_env();

    let cli = Cli::parse();
    let verbosity = cli.verbosity();

    initialize_tracing(verbosity);

    let config = state_tracer::config::Config::load_or_default();

    match cli.command {
        Commands::Annotate(args) => state_tracer::cli::commands::annotate(args, &config).await,
        Commands::Completions(args) => {
            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "state-trace", &mut io::stdout());
            Ok(())
        }
    }
}
