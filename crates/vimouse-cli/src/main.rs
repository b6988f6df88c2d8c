//! vimouse entry point.

mod app;
mod args;

use clap::Parser;
use tracing::error;

use crate::args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // stdout carries overlay events, so logs go to stderr.
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = app::settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run => app::run(config),
        Commands::Detect(args) => app::detect(&config, &args.image, args.labels),
        Commands::Labels(args) => app::labels(&config, args.count),
        Commands::Config => app::print_config(&config),
    }
}
