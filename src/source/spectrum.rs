//! Spectrum playback source
//!
//! Replays an amplitude spectrum as a sum of sinusoids: one line per
//! spectral component, levels in dB re full scale.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SigweaveError};
use crate::signal::{db_to_linear, Signal};

/// One spectral line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumLine {
    /// Frequency in Hz
    pub frequency: f64,
    /// Level in dB (full-scale sine at 0 dB)
    pub level_db: f64,
}

/// Spectrum playback: a fixed-duration sum of sinusoids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumSource {
    pub lines: Vec<SpectrumLine>,
    pub duration_secs: f64,
}

impl SpectrumSource {
    pub fn new(lines: Vec<SpectrumLine>, duration_secs: f64) -> Result<Self> {
        let source = Self {
            lines,
            duration_secs,
        };
        source.validate()?;
        Ok(source)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lines.is_empty() {
            return Err(SigweaveError::InvalidParameter {
                param: "lines".to_string(),
                value: "0".to_string(),
                expected: "at least one spectral line".to_string(),
            });
        }
        for line in &self.lines {
            if !line.frequency.is_finite() || line.frequency < 0.0 || !line.level_db.is_finite()
            {
                return Err(SigweaveError::InvalidParameter {
                    param: "lines".to_string(),
                    value: format!("({}, {})", line.frequency, line.level_db),
                    expected: "finite level at finite non-negative frequency".to_string(),
                });
            }
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(SigweaveError::InvalidParameter {
                param: "duration_secs".to_string(),
                value: self.duration_secs.to_string(),
                expected: "positive finite seconds".to_string(),
            });
        }
        Ok(())
    }

    pub fn generate(&self, sample_rate: f64) -> Result<Signal> {
        self.validate()?;

        let nyquist = sample_rate / 2.0;
        let audible: Vec<(f64, f64)> = self
            .lines
            .iter()
            .filter(|line| {
                if line.frequency >= nyquist {
                    debug!(
                        "skipping spectrum line at {} Hz (Nyquist is {} Hz)",
                        line.frequency, nyquist
                    );
                    false
                } else {
                    true
                }
            })
            .map(|line| (line.frequency, db_to_linear(line.level_db)))
            .collect();

        let num_samples = (self.duration_secs * sample_rate).round() as usize;
        let samples = (0..num_samples)
            .map(|n| {
                let t = n as f64 / sample_rate;
                audible
                    .iter()
                    .map(|&(frequency, amplitude)| {
                        amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin()
                    })
                    .sum()
            })
            .collect();

        Signal::new(samples, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_single_line_is_a_sine() {
        let source = SpectrumSource::new(
            vec![SpectrumLine {
                frequency: 1000.0,
                level_db: 0.0,
            }],
            1.0,
        )
        .unwrap();
        let signal = source.generate(48000.0).unwrap();
        let expected = Signal::sine_wave(1000.0, 1.0, 1.0, 48000.0);
        assert!(signal.is_approx_equal(&expected, 1e-12));
    }

    #[test]
    fn test_level_scales_amplitude() {
        let source = SpectrumSource::new(
            vec![SpectrumLine {
                frequency: 1000.0,
                level_db: -20.0,
            }],
            0.1,
        )
        .unwrap();
        let signal = source.generate(48000.0).unwrap();
        assert_abs_diff_eq!(signal.peak(), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_lines_above_nyquist_are_skipped() {
        let source = SpectrumSource::new(
            vec![SpectrumLine {
                frequency: 30000.0,
                level_db: 0.0,
            }],
            0.1,
        )
        .unwrap();
        let signal = source.generate(48000.0).unwrap();
        assert_eq!(signal.peak(), 0.0);
    }

    #[test]
    fn test_rejects_empty_and_bad_duration() {
        assert!(SpectrumSource::new(vec![], 1.0).is_err());
        assert!(SpectrumSource::new(
            vec![SpectrumLine {
                frequency: 100.0,
                level_db: 0.0
            }],
            0.0
        )
        .is_err());
    }
}
