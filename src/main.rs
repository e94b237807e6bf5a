// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Cook {
            recipe,
            run,
            validate_only,
        } => commands::cmd_cook(config, &recipe, &run, validate_only),
        Commands::Source { recipe, run } => commands::cmd_source(config, &recipe, &run),
        Commands::Build { recipe, run } => commands::cmd_build(config, &recipe, &run),
        Commands::Package { recipe, run } => commands::cmd_package(config, &recipe, &run),
        Commands::Info { recipe, run, json } => commands::cmd_info(config, &recipe, &run, json),
        Commands::Verify { package_dir } => commands::cmd_verify(&package_dir),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "kitchen", &mut std::io::stdout());
            Ok(())
        }
    }
}
