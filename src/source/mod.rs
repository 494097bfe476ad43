//! Source generators
//!
//! Each track owns one source, a generator that produces a time-domain
//! signal at a requested sampling rate. The variants are a closed set, so
//! the polymorphism is a tagged union rather than a trait object; the
//! integer tags double as the persistence discriminant.

pub mod clip;
pub mod harmonics;
pub mod noise;
pub mod spectrum;

pub use clip::AudioClipSource;
pub use harmonics::{HarmonicControls, HarmonicsSource, HarmonicsTwoControlsSource};
pub use noise::{BroadbandNoiseSource, BroadbandNoiseTwoControlsSource, NoiseControls};
pub use spectrum::{SpectrumLine, SpectrumSource};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SigweaveError};
use crate::signal::Signal;

// ============================================================================
// Control profiles
// ============================================================================

/// Piecewise-linear control profile: a value evolving over time.
///
/// Sampling outside the profile's span clamps to the end values. Breakpoint
/// times must be strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlProfile {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl ControlProfile {
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        let profile = Self { times, values };
        profile.validate()?;
        Ok(profile)
    }

    /// A single-breakpoint profile holding `value` forever.
    pub fn constant(value: f64) -> Self {
        Self {
            times: vec![0.0],
            values: vec![value],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.times.is_empty() || self.times.len() != self.values.len() {
            return Err(SigweaveError::InvalidParameter {
                param: "control_profile".to_string(),
                value: format!("{} times, {} values", self.times.len(), self.values.len()),
                expected: "equal non-zero breakpoint counts".to_string(),
            });
        }
        if self
            .times
            .iter()
            .chain(self.values.iter())
            .any(|v| !v.is_finite())
        {
            return Err(SigweaveError::InvalidParameter {
                param: "control_profile".to_string(),
                value: "non-finite".to_string(),
                expected: "finite breakpoints".to_string(),
            });
        }
        for pair in self.times.windows(2) {
            if pair[1] <= pair[0] {
                return Err(SigweaveError::InvalidParameter {
                    param: "control_profile".to_string(),
                    value: format!("time {} after {}", pair[1], pair[0]),
                    expected: "strictly increasing times".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Value at time `t`, end-clamped linear interpolation.
    ///
    /// An empty profile (never produced by `new`, only by a malformed
    /// record that skipped validation) reads as zero.
    pub fn value_at(&self, t: f64) -> f64 {
        let count = self.times.len();
        if count == 0 {
            return 0.0;
        }
        if t <= self.times[0] {
            return self.values[0];
        }
        if t >= self.times[count - 1] {
            return self.values[count - 1];
        }
        let idx = self.times.partition_point(|&time| time < t);
        let t0 = self.times[idx - 1];
        let t1 = self.times[idx];
        let fraction = (t - t0) / (t1 - t0);
        self.values[idx - 1] + fraction * (self.values[idx] - self.values[idx - 1])
    }

    /// Span of the profile in seconds (time of the last breakpoint).
    pub fn duration_secs(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

// ============================================================================
// Source
// ============================================================================

/// Persistence tags for the source variants.
pub const TAG_SPECTRUM: u32 = 0;
pub const TAG_BROADBAND_NOISE: u32 = 1;
pub const TAG_BROADBAND_NOISE_TWO_CONTROLS: u32 = 2;
pub const TAG_HARMONICS: u32 = 3;
pub const TAG_HARMONICS_TWO_CONTROLS: u32 = 4;
pub const TAG_AUDIO_CLIP: u32 = 5;

/// A signal source: one of the six generator variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Spectrum(SpectrumSource),
    BroadbandNoise(BroadbandNoiseSource),
    BroadbandNoiseTwoControls(BroadbandNoiseTwoControlsSource),
    Harmonics(HarmonicsSource),
    HarmonicsTwoControls(HarmonicsTwoControlsSource),
    AudioClip(AudioClipSource),
}

impl Source {
    /// Generate the time-domain signal at `sample_rate`.
    ///
    /// Generation is deterministic: two calls with the same source and rate
    /// produce bit-identical signals (noise variants carry their seed).
    pub fn generate(&self, sample_rate: f64) -> Result<Signal> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(SigweaveError::InvalidParameter {
                param: "sample_rate".to_string(),
                value: sample_rate.to_string(),
                expected: "positive finite Hz".to_string(),
            });
        }
        match self {
            Source::Spectrum(s) => s.generate(sample_rate),
            Source::BroadbandNoise(s) => s.generate(sample_rate),
            Source::BroadbandNoiseTwoControls(s) => s.generate(sample_rate),
            Source::Harmonics(s) => s.generate(sample_rate),
            Source::HarmonicsTwoControls(s) => s.generate(sample_rate),
            Source::AudioClip(s) => s.generate(sample_rate),
        }
    }

    /// Integer persistence tag of this variant.
    pub fn type_tag(&self) -> u32 {
        match self {
            Source::Spectrum(_) => TAG_SPECTRUM,
            Source::BroadbandNoise(_) => TAG_BROADBAND_NOISE,
            Source::BroadbandNoiseTwoControls(_) => TAG_BROADBAND_NOISE_TWO_CONTROLS,
            Source::Harmonics(_) => TAG_HARMONICS,
            Source::HarmonicsTwoControls(_) => TAG_HARMONICS_TWO_CONTROLS,
            Source::AudioClip(_) => TAG_AUDIO_CLIP,
        }
    }

    /// Human-readable variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            Source::Spectrum(_) => "spectrum",
            Source::BroadbandNoise(_) => "broadband-noise",
            Source::BroadbandNoiseTwoControls(_) => "broadband-noise-two-controls",
            Source::Harmonics(_) => "harmonics",
            Source::HarmonicsTwoControls(_) => "harmonics-two-controls",
            Source::AudioClip(_) => "audio-clip",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Source::Spectrum(s) => s.validate(),
            Source::BroadbandNoise(s) => s.validate(),
            Source::BroadbandNoiseTwoControls(s) => s.validate(),
            Source::Harmonics(s) => s.validate(),
            Source::HarmonicsTwoControls(s) => s.validate(),
            Source::AudioClip(s) => s.validate(),
        }
    }

    /// Split into the persistence triple: `(tag, parameters, control)`.
    ///
    /// Stationary variants carry `Null` in the control slot; the two-control
    /// variants store their profiles there.
    pub fn to_parts(&self) -> Result<(u32, Value, Value)> {
        let (params, control) = match self {
            Source::Spectrum(s) => (serde_json::to_value(s)?, Value::Null),
            Source::BroadbandNoise(s) => (serde_json::to_value(s)?, Value::Null),
            Source::BroadbandNoiseTwoControls(s) => (
                serde_json::json!({ "level_db": s.level_db, "seed": s.seed }),
                serde_json::to_value(&s.controls)?,
            ),
            Source::Harmonics(s) => (serde_json::to_value(s)?, Value::Null),
            Source::HarmonicsTwoControls(s) => (
                serde_json::json!({ "levels_db": s.levels_db }),
                serde_json::to_value(&s.controls)?,
            ),
            Source::AudioClip(s) => (serde_json::to_value(s)?, Value::Null),
        };
        Ok((self.type_tag(), params, control))
    }

    /// Rebuild a source from its persistence triple.
    pub fn from_parts(tag: u32, params: &Value, control: &Value) -> Result<Source> {
        let source = match tag {
            TAG_SPECTRUM => Source::Spectrum(serde_json::from_value(params.clone())?),
            TAG_BROADBAND_NOISE => {
                Source::BroadbandNoise(serde_json::from_value(params.clone())?)
            }
            TAG_BROADBAND_NOISE_TWO_CONTROLS => {
                Source::BroadbandNoiseTwoControls(BroadbandNoiseTwoControlsSource {
                    level_db: blob_f64(params, "level_db")?,
                    seed: blob_u64(params, "seed")?,
                    controls: serde_json::from_value(control.clone())?,
                })
            }
            TAG_HARMONICS => Source::Harmonics(serde_json::from_value(params.clone())?),
            TAG_HARMONICS_TWO_CONTROLS => {
                Source::HarmonicsTwoControls(HarmonicsTwoControlsSource {
                    levels_db: blob_field(params, "levels_db")?,
                    controls: serde_json::from_value(control.clone())?,
                })
            }
            TAG_AUDIO_CLIP => Source::AudioClip(serde_json::from_value(params.clone())?),
            _ => return Err(SigweaveError::UnknownSourceType { tag }),
        };
        source.validate()?;
        Ok(source)
    }
}

fn blob_f64(params: &Value, field: &str) -> Result<f64> {
    params
        .get(field)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| SigweaveError::InvalidParameter {
            param: field.to_string(),
            value: params.to_string(),
            expected: "number field in source parameters".to_string(),
        })
}

fn blob_u64(params: &Value, field: &str) -> Result<u64> {
    params
        .get(field)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| SigweaveError::InvalidParameter {
            param: field.to_string(),
            value: params.to_string(),
            expected: "unsigned integer field in source parameters".to_string(),
        })
}

fn blob_field<T: serde::de::DeserializeOwned>(params: &Value, field: &str) -> Result<T> {
    let value = params
        .get(field)
        .cloned()
        .ok_or_else(|| SigweaveError::InvalidParameter {
            param: field.to_string(),
            value: params.to_string(),
            expected: "field present in source parameters".to_string(),
        })?;
    Ok(serde_json::from_value(value)?)
}

// ============================================================================
// Tests
// ============================================================================
