mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use console::style;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("CREATE_PROJECT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> miette::Result<()> {
    init_logging();

    let cli = Cli::parse();
    if !cli.extra.is_empty() {
        eprintln!(
            "{} Invalid command: {}",
            style("error:").red().bold(),
            cli.extra.join(" ")
        );
        eprintln!("See --help for a list of available options.");
        std::process::exit(1);
    }

    commands::new::run(
        cli.directory,
        cli.template,
        cli.overwrite,
        cli.dry_run,
        cli.templates_dir,
    )
}
