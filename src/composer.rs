//! Composer
//!
//! The aggregate of all tracks. Processing runs every track at the same
//! sampling rate and sums the generated signals element-wise. Track order is
//! insertion order and is preserved through persistence; summation is
//! mathematically commutative but floating-point rounding is not, so the
//! fixed order keeps renders reproducible.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::warn;

use crate::error::Result;
use crate::project::{ProjectFile, CURRENT_SCHEMA_VERSION};
use crate::signal::Signal;
use crate::track::Track;

/// Ordered collection of tracks with a summed output.
///
/// # Example
/// ```
/// use sigweave::composer::Composer;
/// use sigweave::source::{BroadbandNoiseSource, Source};
/// use sigweave::track::Track;
///
/// let mut composer = Composer::new("bench test");
/// let mut track = Track::new("floor noise");
/// track.set_source(Source::BroadbandNoise(
///     BroadbandNoiseSource::new(-30.0, 0.5, 42).unwrap(),
/// ));
/// composer.add_track(track);
/// composer.process(48000.0).unwrap();
/// assert_eq!(composer.output().unwrap().len(), 24000);
/// ```
#[derive(Debug, Clone)]
pub struct Composer {
    name: String,
    tracks: Vec<Track>,
    output: Option<Signal>,
    created_at: DateTime<Utc>,
}

impl Composer {
    /// Create an empty composer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
            output: None,
            created_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Append a track. Names need not be unique.
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut Vec<Track> {
        &mut self.tracks
    }

    /// Process every track at `sample_rate` and sum the outputs.
    ///
    /// An empty track list is a warning, not an error: the output is
    /// cleared and the call succeeds. Tracks of unequal duration are summed
    /// zero-padded to the longest.
    pub fn process(&mut self, sample_rate: f64) -> Result<()> {
        if self.tracks.is_empty() {
            warn!("composer '{}' has no tracks; nothing to process", self.name);
            self.output = None;
            return Ok(());
        }

        let mut aggregate: Option<Signal> = None;
        for track in &mut self.tracks {
            track.process(sample_rate)?;
            let signal = match track.output() {
                Some(signal) => signal,
                None => continue,
            };
            match aggregate {
                Some(ref mut sum) => sum.mix(signal),
                None => aggregate = Some(signal.clone()),
            }
        }
        self.output = aggregate;
        Ok(())
    }

    /// The aggregate signal, `None` (with a warning) before `process`.
    pub fn output(&self) -> Option<&Signal> {
        if self.output.is_none() {
            warn!("composer '{}' has not been processed yet", self.name);
        }
        self.output.as_ref()
    }

    /// The aggregate samples, `None` (with a warning) before `process`.
    pub fn output_samples(&self) -> Option<&[f64]> {
        self.output().map(|signal| signal.samples())
    }

    /// Serialize the project name and track list to a JSON project file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let records = self
            .tracks
            .iter()
            .map(|track| track.to_record())
            .collect::<Result<Vec<_>>>()?;
        let file = ProjectFile {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            name: self.name.clone(),
            created_at: self.created_at,
            modified_at: Utc::now(),
            tracks: records,
        };
        file.save(path)
    }

    /// Restore a composer from a JSON project file.
    ///
    /// A project with zero track records loads as an empty composer with a
    /// warning.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = ProjectFile::load(path)?;
        if file.tracks.is_empty() {
            warn!("project '{}' contains no tracks", file.name);
        }
        let tracks = file
            .tracks
            .iter()
            .map(Track::from_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: file.name,
            tracks,
            output: None,
            created_at: file.created_at,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Source, SpectrumLine, SpectrumSource};
    use approx::assert_abs_diff_eq;

    fn sine_track(name: &str, frequency: f64, level_db: f64) -> Track {
        let mut track = Track::new(name);
        track.set_source(Source::Spectrum(
            SpectrumSource::new(
                vec![SpectrumLine {
                    frequency,
                    level_db,
                }],
                0.25,
            )
            .unwrap(),
        ));
        track
    }

    #[test]
    fn test_empty_composer_processes_to_nothing() {
        let mut composer = Composer::new("empty");
        composer.process(48000.0).unwrap();
        assert!(composer.output().is_none());
        assert!(composer.output_samples().is_none());
    }

    #[test]
    fn test_single_track_identity() {
        let mut composer = Composer::new("solo");
        composer.add_track(sine_track("only", 1000.0, 0.0));
        composer.process(48000.0).unwrap();

        let expected = composer.tracks()[0].source().unwrap().generate(48000.0).unwrap();
        assert_eq!(composer.output().unwrap(), &expected);
    }

    #[test]
    fn test_two_tracks_sum_elementwise() {
        let mut composer = Composer::new("pair");
        composer.add_track(sine_track("a", 1000.0, 0.0));
        composer.add_track(sine_track("b", 1000.0, 0.0));
        composer.process(48000.0).unwrap();

        // Identical sines double in amplitude
        let peak = composer.output().unwrap().peak();
        assert_abs_diff_eq!(peak, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unequal_durations_pad_to_longest() {
        let mut short = Track::new("short");
        short.set_source(Source::Spectrum(
            SpectrumSource::new(
                vec![SpectrumLine {
                    frequency: 500.0,
                    level_db: 0.0,
                }],
                0.1,
            )
            .unwrap(),
        ));
        let mut composer = Composer::new("mixed lengths");
        composer.add_track(short);
        composer.add_track(sine_track("long", 500.0, 0.0));
        composer.process(48000.0).unwrap();

        assert_eq!(composer.output().unwrap().len(), 12000);
    }

    #[test]
    fn test_failing_track_aborts_processing() {
        let mut composer = Composer::new("broken");
        composer.add_track(Track::new("no source"));
        assert!(composer.process(48000.0).is_err());
    }

    #[test]
    fn test_process_is_idempotent() {
        let mut composer = Composer::new("repeat");
        composer.add_track(sine_track("a", 750.0, -3.0));
        composer.process(48000.0).unwrap();
        let first = composer.output().unwrap().clone();
        composer.process(48000.0).unwrap();
        assert_eq!(composer.output().unwrap(), &first);
    }
}
