//! sankey - render a single-source Sankey diagram file as SVG
//!
//! Usage: `sankey [FILE]`. Without a file argument the program asks for one.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_deref());

    let stdout = std::io::stdout();
    if let Err(err) = cli::run(&cli, &mut stdout.lock()) {
        tracing::debug!(error = ?err, "render aborted");
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn setup_logging(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level.to_lowercase()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    // stdout carries the SVG document
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
