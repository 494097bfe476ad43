//! Harmonic series sources
//!
//! A fundamental plus integer-multiple partials, each with its own level.
//! The two-control variant sweeps the fundamental and an overall level
//! offset over time; partials are generated by per-harmonic phase
//! accumulation so frequency sweeps stay phase-continuous.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SigweaveError};
use crate::signal::{db_to_linear, Signal};
use crate::source::ControlProfile;

/// Stationary harmonic series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicsSource {
    /// Fundamental frequency in Hz
    pub fundamental_hz: f64,
    /// Level of each partial in dB, index 0 is the fundamental
    pub levels_db: Vec<f64>,
    pub duration_secs: f64,
}

impl HarmonicsSource {
    pub fn new(fundamental_hz: f64, levels_db: Vec<f64>, duration_secs: f64) -> Result<Self> {
        let source = Self {
            fundamental_hz,
            levels_db,
            duration_secs,
        };
        source.validate()?;
        Ok(source)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fundamental_hz.is_finite() || self.fundamental_hz <= 0.0 {
            return Err(SigweaveError::InvalidParameter {
                param: "fundamental_hz".to_string(),
                value: self.fundamental_hz.to_string(),
                expected: "positive finite Hz".to_string(),
            });
        }
        validate_levels(&self.levels_db)?;
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
        let partials: Vec<(f64, f64)> = self
            .levels_db
            .iter()
            .enumerate()
            .map(|(k, &level)| {
                (
                    self.fundamental_hz * (k + 1) as f64,
                    db_to_linear(level),
                )
            })
            .filter(|&(frequency, _)| frequency < nyquist)
            .collect();

        let num_samples = (self.duration_secs * sample_rate).round() as usize;
        let samples = (0..num_samples)
            .map(|n| {
                let t = n as f64 / sample_rate;
                partials
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

/// The two control profiles of [`HarmonicsTwoControlsSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicControls {
    /// Fundamental frequency over time, in Hz
    pub fundamental_hz: ControlProfile,
    /// Overall level offset over time, in dB (added to every partial)
    pub level_offset_db: ControlProfile,
}

/// Harmonic series driven by fundamental and level profiles.
///
/// The signal's duration is the fundamental profile's span. Partials whose
/// instantaneous frequency reaches Nyquist fall silent for those samples.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicsTwoControlsSource {
    /// Level of each partial in dB, index 0 is the fundamental
    pub levels_db: Vec<f64>,
    pub controls: HarmonicControls,
}

impl HarmonicsTwoControlsSource {
    pub fn new(levels_db: Vec<f64>, controls: HarmonicControls) -> Result<Self> {
        let source = Self {
            levels_db,
            controls,
        };
        source.validate()?;
        Ok(source)
    }

    pub fn validate(&self) -> Result<()> {
        validate_levels(&self.levels_db)?;
        self.controls.fundamental_hz.validate()?;
        self.controls.level_offset_db.validate()?;
        if self.controls.fundamental_hz.values().iter().any(|&f| f <= 0.0) {
            return Err(SigweaveError::InvalidParameter {
                param: "controls.fundamental_hz".to_string(),
                value: "non-positive breakpoint".to_string(),
                expected: "positive frequencies".to_string(),
            });
        }
        if self.controls.fundamental_hz.duration_secs() <= 0.0 {
            return Err(SigweaveError::InvalidParameter {
                param: "controls.fundamental_hz".to_string(),
                value: self.controls.fundamental_hz.duration_secs().to_string(),
                expected: "frequency profile spanning more than 0 seconds".to_string(),
            });
        }
        Ok(())
    }

    pub fn generate(&self, sample_rate: f64) -> Result<Signal> {
        self.validate()?;

        let nyquist = sample_rate / 2.0;
        let duration = self.controls.fundamental_hz.duration_secs();
        let num_samples = (duration * sample_rate).round() as usize;
        let mut phases = vec![0.0_f64; self.levels_db.len()];
        let mut samples = Vec::with_capacity(num_samples);

        for n in 0..num_samples {
            let t = n as f64 / sample_rate;
            let fundamental = self.controls.fundamental_hz.value_at(t);
            let offset = self.controls.level_offset_db.value_at(t);

            let mut sample = 0.0;
            for (k, &level) in self.levels_db.iter().enumerate() {
                let frequency = fundamental * (k + 1) as f64;
                if frequency < nyquist {
                    sample += db_to_linear(level + offset) * phases[k].sin();
                }
                phases[k] += 2.0 * std::f64::consts::PI * frequency / sample_rate;
            }
            samples.push(sample);
        }

        Signal::new(samples, sample_rate)
    }
}

fn validate_levels(levels_db: &[f64]) -> Result<()> {
    if levels_db.is_empty() {
        return Err(SigweaveError::InvalidParameter {
            param: "levels_db".to_string(),
            value: "0".to_string(),
            expected: "at least one partial level".to_string(),
        });
    }
    if levels_db.iter().any(|v| !v.is_finite()) {
        return Err(SigweaveError::InvalidParameter {
            param: "levels_db".to_string(),
            value: "non-finite".to_string(),
            expected: "finite dB levels".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_single_partial_is_a_sine() {
        let source = HarmonicsSource::new(1000.0, vec![0.0], 0.5).unwrap();
        let signal = source.generate(48000.0).unwrap();
        let expected = Signal::sine_wave(1000.0, 1.0, 0.5, 48000.0);
        assert!(signal.is_approx_equal(&expected, 1e-12));
    }

    #[test]
    fn test_partials_above_nyquist_fall_silent() {
        // Fundamental 20 kHz: second partial at 40 kHz is dropped at 48 kHz
        let source = HarmonicsSource::new(20000.0, vec![0.0, 0.0], 0.1).unwrap();
        let signal = source.generate(48000.0).unwrap();
        assert!(signal.peak() <= 1.0 + 1e-9);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let source = HarmonicsSource::new(120.0, vec![0.0, -6.0, -12.0], 0.2).unwrap();
        let a = source.generate(48000.0).unwrap();
        let b = source.generate(48000.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_swept_fundamental_duration_and_start_phase() {
        let source = HarmonicsTwoControlsSource::new(
            vec![0.0],
            HarmonicControls {
                fundamental_hz: ControlProfile::new(vec![0.0, 1.0], vec![100.0, 400.0]).unwrap(),
                level_offset_db: ControlProfile::constant(0.0),
            },
        )
        .unwrap();
        let signal = source.generate(48000.0).unwrap();
        assert_eq!(signal.len(), 48000);
        // Phase accumulation starts at zero
        assert_abs_diff_eq!(signal.samples()[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_level_offset_profile_scales_output() {
        let quiet = HarmonicsTwoControlsSource::new(
            vec![0.0],
            HarmonicControls {
                fundamental_hz: ControlProfile::new(vec![0.0, 0.1], vec![500.0, 500.0]).unwrap(),
                level_offset_db: ControlProfile::constant(-20.0),
            },
        )
        .unwrap();
        let signal = quiet.generate(48000.0).unwrap();
        assert!(signal.peak() < 0.11);
        assert!(signal.peak() > 0.09);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(HarmonicsSource::new(0.0, vec![0.0], 1.0).is_err());
        assert!(HarmonicsSource::new(100.0, vec![], 1.0).is_err());
        assert!(HarmonicsSource::new(100.0, vec![0.0], -1.0).is_err());
        assert!(HarmonicsTwoControlsSource::new(
            vec![0.0],
            HarmonicControls {
                fundamental_hz: ControlProfile::new(vec![0.0, 1.0], vec![100.0, -50.0]).unwrap(),
                level_offset_db: ControlProfile::constant(0.0),
            },
        )
        .is_err());
    }
}
