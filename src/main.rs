//! Sigweave CLI - Signal-Synthesis Composition Engine
//!
//! Command-line interface for creating, inspecting, and rendering Sigweave
//! projects.

use clap::Parser;
use env_logger::Env;
use log::info;

use sigweave::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("Sigweave v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::New { path, name } => commands::new_project(&path, &name)?,
        Commands::Info { path } => commands::info_project(&path)?,
        Commands::Render {
            path,
            output,
            sample_rate,
        } => commands::render(&path, &output, sample_rate)?,
    }

    Ok(())
}
