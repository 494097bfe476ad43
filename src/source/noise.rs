//! Broadband noise sources
//!
//! Uniform white noise with an explicit RNG seed, so generation is
//! reproducible. The two-control variant drives the level and a one-pole
//! low-pass cutoff from time profiles.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SigweaveError};
use crate::signal::{db_to_linear, Signal};
use crate::source::ControlProfile;

/// Stationary broadband noise at a constant level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadbandNoiseSource {
    /// Level in dB (peak amplitude of the raw noise)
    pub level_db: f64,
    pub duration_secs: f64,
    /// RNG seed; same seed, same samples
    pub seed: u64,
}

impl BroadbandNoiseSource {
    pub fn new(level_db: f64, duration_secs: f64, seed: u64) -> Result<Self> {
        let source = Self {
            level_db,
            duration_secs,
            seed,
        };
        source.validate()?;
        Ok(source)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.level_db.is_finite() {
            return Err(SigweaveError::InvalidParameter {
                param: "level_db".to_string(),
                value: self.level_db.to_string(),
                expected: "finite dB".to_string(),
            });
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

        let amplitude = db_to_linear(self.level_db);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let num_samples = (self.duration_secs * sample_rate).round() as usize;
        let samples = (0..num_samples)
            .map(|_| amplitude * rng.gen_range(-1.0..=1.0))
            .collect();

        Signal::new(samples, sample_rate)
    }
}

/// The two control profiles of [`BroadbandNoiseTwoControlsSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseControls {
    /// Level offset over time, in dB (added to the base level)
    pub level_db: ControlProfile,
    /// One-pole low-pass cutoff over time, in Hz
    pub cutoff_hz: ControlProfile,
}

/// Broadband noise driven by level and cutoff profiles.
///
/// The signal's duration is the level profile's span. The cutoff profile is
/// end-clamped and may be shorter or longer than the level profile.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadbandNoiseTwoControlsSource {
    /// Base level in dB
    pub level_db: f64,
    /// RNG seed; same seed, same samples
    pub seed: u64,
    pub controls: NoiseControls,
}

impl BroadbandNoiseTwoControlsSource {
    pub fn new(level_db: f64, seed: u64, controls: NoiseControls) -> Result<Self> {
        let source = Self {
            level_db,
            seed,
            controls,
        };
        source.validate()?;
        Ok(source)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.level_db.is_finite() {
            return Err(SigweaveError::InvalidParameter {
                param: "level_db".to_string(),
                value: self.level_db.to_string(),
                expected: "finite dB".to_string(),
            });
        }
        self.controls.level_db.validate()?;
        self.controls.cutoff_hz.validate()?;
        if self.controls.level_db.duration_secs() <= 0.0 {
            return Err(SigweaveError::InvalidParameter {
                param: "controls.level_db".to_string(),
                value: self.controls.level_db.duration_secs().to_string(),
                expected: "level profile spanning more than 0 seconds".to_string(),
            });
        }
        Ok(())
    }

    pub fn generate(&self, sample_rate: f64) -> Result<Signal> {
        self.validate()?;

        let duration = self.controls.level_db.duration_secs();
        let num_samples = (duration * sample_rate).round() as usize;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut state = 0.0_f64;
        let mut samples = Vec::with_capacity(num_samples);

        for n in 0..num_samples {
            let t = n as f64 / sample_rate;
            let cutoff = self
                .controls
                .cutoff_hz
                .value_at(t)
                .clamp(1.0, 0.45 * sample_rate);
            let pole = (-2.0 * std::f64::consts::PI * cutoff / sample_rate).exp();
            let white: f64 = rng.gen_range(-1.0..=1.0);
            state = (1.0 - pole) * white + pole * state;

            let level = self.level_db + self.controls.level_db.value_at(t);
            samples.push(db_to_linear(level) * state);
        }

        Signal::new(samples, sample_rate)
    }
}
