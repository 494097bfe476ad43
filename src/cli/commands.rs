//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::info;

use crate::composer::Composer;
use crate::error::Result;
use crate::signal::io::save_wav;

/// Create an empty project file.
pub fn new_project(path: &Path, name: &str) -> Result<()> {
    info!("Creating project '{}' at {}", name, path.display());

    let composer = Composer::new(name);
    composer.save(path)?;

    println!("Project created: {}", path.display());
    Ok(())
}

/// Print a summary of a project.
pub fn info_project(path: &Path) -> Result<()> {
    let composer = Composer::load(path)?;

    println!("Project: {}", composer.name());
    println!("Tracks: {}", composer.tracks().len());
    for (index, track) in composer.tracks().iter().enumerate() {
        let source = track
            .source()
            .map(|s| s.kind())
            .unwrap_or("(no source)");
        let filter = match track.filter() {
            Some(filter) => format!("filter @ {} Hz", filter.sample_rate()),
            None => "no filter".to_string(),
        };
        println!(
            "  {}. '{}'  {}  gain {:+.1} dB  {}",
            index + 1,
            track.name(),
            source,
            track.gain_db(),
            filter
        );
    }
    Ok(())
}

/// Process a project and write the aggregate to a WAV file.
pub fn render(path: &Path, output: &Path, sample_rate: f64) -> Result<()> {
    info!(
        "Rendering {} at {} Hz",
        path.display(),
        sample_rate
    );

    let mut composer = Composer::load(path)?;
    composer.process(sample_rate)?;

    match composer.output() {
        Some(signal) => {
            save_wav(signal, output)?;
            println!(
                "Rendered {:.3}s ({} samples) to {}",
                signal.duration_secs(),
                signal.len(),
                output.display()
            );
        }
        None => {
            println!("Nothing to render: project has no tracks");
        }
    }
    Ok(())
}
