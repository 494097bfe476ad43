//! Signal buffer
//!
//! The core sample buffer type for all synthesis and filtering. A signal is
//! a mono sequence of 64-bit float samples plus the sampling frequency that
//! defines its implicit time axis. Buffers are owned by the stage that
//! produced them and moved to the next stage.

use crate::error::{Result, SigweaveError};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// Returns -f64::INFINITY for zero or negative input.
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Round a sampling frequency to one decimal place.
///
/// Sampling rates coming from different code paths (file headers, user
/// input, profile math) can differ by floating noise; all rate comparisons
/// go through this rounding.
#[inline]
pub fn round_rate(rate_hz: f64) -> f64 {
    (rate_hz * 10.0).round() / 10.0
}

/// Check two sampling frequencies for equality at one-decimal precision.
#[inline]
pub fn rates_match(a_hz: f64, b_hz: f64) -> bool {
    round_rate(a_hz) == round_rate(b_hz)
}

// ============================================================================
// Signal
// ============================================================================

/// A mono signal: samples plus the sampling frequency in Hz.
///
/// # Example
/// ```
/// use sigweave::signal::Signal;
///
/// let signal = Signal::sine_wave(1000.0, 1.0, 0.5, 48000.0);
/// assert_eq!(signal.len(), 24000);
/// assert!((signal.duration_secs() - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate: f64,
}

impl Signal {
    /// Create a signal from raw samples.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `sample_rate` is not a positive finite
    /// number.
    pub fn new(samples: Vec<f64>, sample_rate: f64) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(SigweaveError::InvalidParameter {
                param: "sample_rate".to_string(),
                value: sample_rate.to_string(),
                expected: "positive finite Hz".to_string(),
            });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create a zeroed signal of `num_samples` samples.
    pub fn silence(num_samples: usize, sample_rate: f64) -> Result<Self> {
        Self::new(vec![0.0; num_samples], sample_rate)
    }

    /// Create a sine wave with the given amplitude and duration.
    pub fn sine_wave(frequency: f64, amplitude: f64, duration_secs: f64, sample_rate: f64) -> Self {
        let num_samples = (duration_secs * sample_rate).round() as usize;
        let samples = (0..num_samples)
            .map(|n| {
                let t = n as f64 / sample_rate;
                amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin()
            })
            .collect();
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the signal has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sampling frequency in Hz.
    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Duration in seconds.
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// Immutable access to the samples.
    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Mutable access to the samples.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    /// Consume the signal and return the sample vector.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Apply gain to all samples, `10^(gain_db/20)`.
    pub fn apply_gain_db(&mut self, gain_db: f64) {
        let gain_linear = db_to_linear(gain_db);
        for sample in self.samples.iter_mut() {
            *sample *= gain_linear;
        }
    }

    /// Peak absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
    }

    /// RMS level in dB. Returns -inf for empty or silent signals.
    pub fn rms_db(&self) -> f64 {
        if self.samples.is_empty() {
            return f64::NEG_INFINITY;
        }
        let sum_squares: f64 = self.samples.iter().map(|&s| s * s).sum();
        let rms = (sum_squares / self.samples.len() as f64).sqrt();
        linear_to_db(rms)
    }

    /// Element-wise add `other` into this signal.
    ///
    /// The receiver is zero-padded to the longer of the two lengths first,
    /// so tracks of unequal duration sum without truncation. Both signals
    /// must share a sampling rate at one-decimal precision.
    pub fn mix(&mut self, other: &Signal) {
        debug_assert!(rates_match(self.sample_rate, other.sample_rate));
        if other.samples.len() > self.samples.len() {
            self.samples.resize(other.samples.len(), 0.0);
        }
        for (dst, src) in self.samples.iter_mut().zip(other.samples.iter()) {
            *dst += src;
        }
    }

    /// Compare two signals sample by sample within a tolerance.
    pub fn is_approx_equal(&self, other: &Signal, tolerance: f64) -> bool {
        self.samples.len() == other.samples.len()
            && rates_match(self.sample_rate, other.sample_rate)
            && self
                .samples
                .iter()
                .zip(other.samples.iter())
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_db_to_linear() {
        assert_abs_diff_eq!(db_to_linear(0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(db_to_linear(-20.0), 0.1, epsilon = 1e-12);
        // -6 dB ~= 0.501187
        assert_abs_diff_eq!(db_to_linear(-6.0), 0.501187, epsilon = 1e-6);
    }

    #[test]
    fn test_linear_to_db() {
        assert_abs_diff_eq!(linear_to_db(1.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(linear_to_db(0.1), -20.0, epsilon = 1e-9);
        assert!(linear_to_db(0.0).is_infinite());
        assert!(linear_to_db(0.0).is_sign_negative());
    }

    #[test]
    fn test_db_linear_roundtrip() {
        for &val in &[0.001, 0.1, 0.5, 1.0, 2.0] {
            assert_abs_diff_eq!(db_to_linear(linear_to_db(val)), val, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rates_match_tolerates_float_noise() {
        assert!(rates_match(48000.0, 48000.04));
        assert!(rates_match(44100.0, 44100.0));
        assert!(!rates_match(44100.0, 48000.0));
        assert!(!rates_match(48000.0, 48000.2));
    }

    #[test]
    fn test_new_rejects_bad_rate() {
        assert!(Signal::new(vec![0.0], 0.0).is_err());
        assert!(Signal::new(vec![0.0], -44100.0).is_err());
        assert!(Signal::new(vec![0.0], f64::NAN).is_err());
    }

    #[test]
    fn test_sine_wave_shape() {
        let signal = Signal::sine_wave(1000.0, 1.0, 1.0, 48000.0);
        assert_eq!(signal.len(), 48000);
        // 48 samples per cycle; sample 12 sits on the positive peak
        assert_abs_diff_eq!(signal.samples()[12], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(signal.samples()[0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sine_rms() {
        // Unit sine has RMS 1/sqrt(2) ~= -3.01 dB
        let signal = Signal::sine_wave(1000.0, 1.0, 1.0, 48000.0);
        assert_abs_diff_eq!(signal.rms_db(), -3.0103, epsilon = 0.01);
    }

    #[test]
    fn test_apply_gain_db() {
        let mut signal = Signal::new(vec![0.5; 100], 48000.0).unwrap();
        signal.apply_gain_db(-6.0206);
        assert_abs_diff_eq!(signal.samples()[0], 0.25, epsilon = 1e-4);
    }

    #[test]
    fn test_peak() {
        let signal = Signal::new(vec![0.1, -0.8, 0.3], 48000.0).unwrap();
        assert_abs_diff_eq!(signal.peak(), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_mix_equal_lengths() {
        let mut a = Signal::new(vec![0.1, 0.2, 0.3], 48000.0).unwrap();
        let b = Signal::new(vec![0.3, 0.2, 0.1], 48000.0).unwrap();
        a.mix(&b);
        assert!(a.is_approx_equal(
            &Signal::new(vec![0.4, 0.4, 0.4], 48000.0).unwrap(),
            1e-12
        ));
    }

    #[test]
    fn test_mix_pads_shorter_receiver() {
        let mut a = Signal::new(vec![1.0], 48000.0).unwrap();
        let b = Signal::new(vec![0.5, 0.5, 0.5], 48000.0).unwrap();
        a.mix(&b);
        assert_eq!(a.len(), 3);
        assert_abs_diff_eq!(a.samples()[0], 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(a.samples()[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_silence() {
        let signal = Signal::silence(100, 44100.0).unwrap();
        assert_eq!(signal.len(), 100);
        assert!(signal.samples().iter().all(|&s| s == 0.0));
    }
}
