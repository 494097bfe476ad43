//! Audio file I/O operations
//!
//! Handles loading and saving WAV files using the hound crate. Multi-channel
//! files are mixed down to mono on load; the engine is mono throughout.

use crate::error::{Result, SigweaveError};
use crate::signal::Signal;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// Load a WAV file into a Signal.
///
/// Integer formats are normalized to [-1.0, 1.0]. Multi-channel files are
/// averaged into a single channel.
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<Signal> {
    let path = path.as_ref();
    let reader = WavReader::open(path).map_err(|e| SigweaveError::AudioReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    let sample_rate = spec.sample_rate as f64;

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| {
                s.map(|v| v as f64).map_err(|e| SigweaveError::AudioReadError {
                    path: path.display().to_string(),
                    source: e,
                })
            })
            .collect::<Result<Vec<f64>>>()?,
        SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            let max_val = (1u32 << (bits - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| {
                    s.map(|v| v as f64 / max_val)
                        .map_err(|e| SigweaveError::AudioReadError {
                            path: path.display().to_string(),
                            source: e,
                        })
                })
                .collect::<Result<Vec<f64>>>()?
        }
    };

    let samples = if channels <= 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f64>() / channels as f64)
            .collect()
    };

    Signal::new(samples, sample_rate)
}

/// Save a Signal to a WAV file (mono, 32-bit float).
pub fn save_wav<P: AsRef<Path>>(signal: &Signal, path: P) -> Result<()> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels: 1,
        sample_rate: signal.sample_rate().round() as u32,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| SigweaveError::AudioWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    for &sample in signal.samples() {
        writer
            .write_sample(sample as f32)
            .map_err(|e| SigweaveError::AudioWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
    }

    writer.finalize().map_err(|e| SigweaveError::AudioWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_wav_round_trip_float() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.wav");

        let original = Signal::sine_wave(440.0, 0.5, 0.25, 44100.0);
        save_wav(&original, &path).unwrap();

        let loaded = load_wav(&path).unwrap();

        assert_eq!(original.len(), loaded.len());
        assert_eq!(loaded.sample_rate(), 44100.0);
        // f32 write loses precision against the f64 original
        assert!(original.is_approx_equal(&loaded, 1e-6));
    }

    #[test]
    fn test_load_int_wav_normalizes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_16bit.wav");

        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(i16::MAX).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(i16::MIN).unwrap();
        writer.finalize().unwrap();

        let loaded = load_wav(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert!((loaded.samples()[0] - 1.0).abs() < 1e-3);
        assert_eq!(loaded.samples()[1], 0.0);
        assert!((loaded.samples()[2] + 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_load_stereo_mixes_to_mono() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let spec = WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        // Frame 0: L=1.0, R=0.0 -> 0.5; frame 1: L=0.5, R=0.5 -> 0.5
        for &s in &[1.0f32, 0.0, 0.5, 0.5] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let loaded = load_wav(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!((loaded.samples()[0] - 0.5).abs() < 1e-6);
        assert!((loaded.samples()[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_wav("nonexistent_file.wav");
        assert!(matches!(
            result,
            Err(SigweaveError::AudioReadError { .. })
        ));
    }
}
