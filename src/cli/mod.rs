//! Command-line interface
//!
//! Argument definitions for `sigweave-cli`; the command logic lives in
//! [`commands`].

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sigweave-cli",
    about = "Signal-synthesis composition engine",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty project file
    New {
        /// Path of the project file to create
        path: PathBuf,
        /// Project name
        #[arg(short, long, default_value = "untitled")]
        name: String,
    },
    /// Print a summary of a project's tracks
    Info {
        /// Path of the project file
        path: PathBuf,
    },
    /// Process a project and write the aggregate signal to a WAV file
    Render {
        /// Path of the project file
        path: PathBuf,
        /// Output WAV path
        #[arg(short, long)]
        output: PathBuf,
        /// Sampling frequency in Hz
        #[arg(short = 'r', long, default_value_t = 48000.0)]
        sample_rate: f64,
    },
}
