//! Filter model
//!
//! A linear time-invariant filter held in two equivalent representations:
//! rational transfer-function coefficients `(b, a)` and a frequency-response
//! magnitude curve. Writing either representation recomputes the other, so
//! the two are always mutually derived; clearing one clears both. The
//! sampling frequency is fixed for the life of the model.

use serde::{Deserialize, Serialize};

use crate::dsp::frf;
use crate::dsp::spectral::{minimum_phase_fir, transfer_magnitude_db, DESIGN_FIR_TAPS};
use crate::error::{Result, SigweaveError};
use crate::signal::buffer::rates_match;
use crate::signal::Signal;
use std::path::Path;

/// One point of a frequency-response magnitude curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyPoint {
    /// Frequency in Hz
    pub frequency: f64,
    /// Gain in dB
    pub magnitude_db: f64,
}

impl FrequencyPoint {
    pub fn new(frequency: f64, magnitude_db: f64) -> Self {
        Self {
            frequency,
            magnitude_db,
        }
    }
}

/// Which representation was authoritative in the last public write.
///
/// Both representations are always kept consistent; this marker only records
/// the direction of the last derivation for introspection and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDesign {
    /// `(b, a)` were supplied; the response curve was derived from them.
    Coefficients,
    /// A magnitude curve was supplied; `(b, a)` are a minimum-phase FIR
    /// designed from it.
    MagnitudeResponse,
}

/// Digital filter with synchronized coefficient and response forms.
///
/// # Example
/// ```
/// use sigweave::dsp::FilterModel;
/// use sigweave::signal::Signal;
///
/// let filter = FilterModel::from_coefficients(vec![0.5, 0.5], vec![1.0], 48000.0).unwrap();
/// let impulse = Signal::new(vec![1.0, 0.0, 0.0, 0.0], 48000.0).unwrap();
/// let smoothed = filter.filter(&impulse).unwrap();
/// assert_eq!(smoothed.samples(), &[0.5, 0.5, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct FilterModel {
    /// Numerator coefficients (empty = absent)
    b: Vec<f64>,
    /// Denominator coefficients (empty = absent)
    a: Vec<f64>,
    /// Magnitude curve (empty = absent, ≥2 points otherwise)
    response: Vec<FrequencyPoint>,
    /// Sampling frequency the filter is designed for, fixed at construction
    sample_rate: f64,
    design: FilterDesign,
}

impl FilterModel {
    /// Create a filter from transfer-function coefficients.
    pub fn from_coefficients(b: Vec<f64>, a: Vec<f64>, sample_rate: f64) -> Result<Self> {
        let mut model = Self::empty(sample_rate, FilterDesign::Coefficients)?;
        model.set_coefficients(b, a)?;
        Ok(model)
    }

    /// Create a filter from a frequency-response magnitude curve.
    ///
    /// Designs a minimum-phase FIR matching the curve; see
    /// [`set_frequency_response`](Self::set_frequency_response).
    pub fn from_frequency_response(
        curve: Vec<FrequencyPoint>,
        sample_rate: f64,
    ) -> Result<Self> {
        let mut model = Self::empty(sample_rate, FilterDesign::MagnitudeResponse)?;
        model.set_frequency_response(curve)?;
        Ok(model)
    }

    /// Create a filter from a legacy FRF text file.
    pub fn from_frf_file<P: AsRef<Path>>(path: P, sample_rate: f64) -> Result<Self> {
        let curve = frf::load_frf(path)?;
        Self::from_frequency_response(curve, sample_rate)
    }

    fn empty(sample_rate: f64, design: FilterDesign) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(SigweaveError::InvalidParameter {
                param: "sample_rate".to_string(),
                value: sample_rate.to_string(),
                expected: "positive finite Hz".to_string(),
            });
        }
        Ok(Self {
            b: Vec::new(),
            a: Vec::new(),
            response: Vec::new(),
            sample_rate,
            design,
        })
    }

    /// Sampling frequency the filter is designed for.
    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Numerator coefficients (empty when the filter is cleared).
    pub fn b_coefficients(&self) -> &[f64] {
        &self.b
    }

    /// Denominator coefficients (empty when the filter is cleared).
    pub fn a_coefficients(&self) -> &[f64] {
        &self.a
    }

    /// Frequency-response curve, `None` when the filter is cleared.
    pub fn frequency_response(&self) -> Option<&[FrequencyPoint]> {
        if self.response.is_empty() {
            None
        } else {
            Some(&self.response)
        }
    }

    /// Direction of the last public write.
    pub fn design(&self) -> FilterDesign {
        self.design
    }

    /// Whether the filter currently has a definition.
    pub fn is_defined(&self) -> bool {
        !self.b.is_empty()
    }

    /// Set transfer-function coefficients and derive the response curve.
    ///
    /// An empty `b` or `a` clears both representations. Otherwise `a[0]`
    /// must be non-zero, and the response is recomputed at `len(b)` equally
    /// spaced frequencies from 0 to Nyquist (a single-tap `b` still yields
    /// the 2-point minimum a response curve needs).
    pub fn set_coefficients(&mut self, b: Vec<f64>, a: Vec<f64>) -> Result<()> {
        if b.is_empty() || a.is_empty() {
            self.clear();
            return Ok(());
        }
        if a[0] == 0.0 {
            return Err(SigweaveError::InvalidParameter {
                param: "a[0]".to_string(),
                value: "0".to_string(),
                expected: "non-zero leading denominator coefficient".to_string(),
            });
        }
        if b.iter().chain(a.iter()).any(|c| !c.is_finite()) {
            return Err(SigweaveError::InvalidParameter {
                param: "coefficients".to_string(),
                value: "non-finite".to_string(),
                expected: "finite values".to_string(),
            });
        }

        let points = b.len().max(2);
        let nyquist = self.sample_rate / 2.0;
        self.response = (0..points)
            .map(|i| {
                let frequency = i as f64 * nyquist / (points - 1) as f64;
                FrequencyPoint::new(
                    frequency,
                    transfer_magnitude_db(&b, &a, self.sample_rate, frequency),
                )
            })
            .collect();
        self.b = b;
        self.a = a;
        self.design = FilterDesign::Coefficients;
        Ok(())
    }

    /// Set the frequency-response curve and design matching coefficients.
    ///
    /// An empty curve clears both representations. A supplied curve needs at
    /// least 2 points with finite values and strictly increasing,
    /// non-negative frequencies. The coefficients become a minimum-phase FIR
    /// whose magnitude matches the curve (zero-padded to Nyquist when the
    /// curve stops short of it, truncated when it extends past it), with
    /// `a = [1.0]`.
    pub fn set_frequency_response(&mut self, curve: Vec<FrequencyPoint>) -> Result<()> {
        if curve.is_empty() {
            self.clear();
            return Ok(());
        }
        Self::validate_curve(&curve)?;

        self.b = minimum_phase_fir(&curve, self.sample_rate, DESIGN_FIR_TAPS)?;
        self.a = vec![1.0];
        self.response = curve;
        self.design = FilterDesign::MagnitudeResponse;
        Ok(())
    }

    /// Load a legacy FRF text file into the response curve.
    ///
    /// Behaves as [`set_frequency_response`](Self::set_frequency_response)
    /// with the file's curve.
    pub fn set_frequency_response_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let curve = frf::load_frf(path)?;
        self.set_frequency_response(curve)
    }

    fn validate_curve(curve: &[FrequencyPoint]) -> Result<()> {
        if curve.len() < 2 {
            return Err(SigweaveError::CurveTooShort {
                points: curve.len(),
            });
        }
        for point in curve {
            if !point.frequency.is_finite()
                || point.frequency < 0.0
                || !point.magnitude_db.is_finite()
            {
                return Err(SigweaveError::InvalidParameter {
                    param: "frequency_response".to_string(),
                    value: format!("({}, {})", point.frequency, point.magnitude_db),
                    expected: "finite magnitude at finite non-negative frequency".to_string(),
                });
            }
        }
        for pair in curve.windows(2) {
            if pair[1].frequency <= pair[0].frequency {
                return Err(SigweaveError::InvalidParameter {
                    param: "frequency_response".to_string(),
                    value: format!("{} after {}", pair[1].frequency, pair[0].frequency),
                    expected: "strictly increasing frequencies".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Clear both representations. Clearing is total: a filter never holds
    /// only one of the two forms.
    pub fn clear(&mut self) {
        self.b.clear();
        self.a.clear();
        self.response.clear();
    }

    /// Apply the filter with the standard difference equation
    /// `y[n] = (Σ_k b[k]·x[n−k] − Σ_{k≥1} a[k]·y[n−k]) / a[0]`.
    ///
    /// # Errors
    /// `SampleRateMismatch` if the signal's rate differs from the filter's
    /// (compared at one-decimal precision); `MissingCoefficients` if the
    /// filter has been cleared.
    pub fn filter(&self, signal: &Signal) -> Result<Signal> {
        if !rates_match(signal.sample_rate(), self.sample_rate) {
            return Err(SigweaveError::SampleRateMismatch {
                expected_hz: self.sample_rate,
                actual_hz: signal.sample_rate(),
            });
        }
        if self.b.is_empty() || self.a.is_empty() {
            return Err(SigweaveError::MissingCoefficients {
                reason: "filter has no definition".to_string(),
            });
        }

        let x = signal.samples();
        let a0 = self.a[0];
        let mut y = vec![0.0_f64; x.len()];
        for n in 0..x.len() {
            let mut acc = 0.0;
            for (k, &bk) in self.b.iter().enumerate() {
                if n >= k {
                    acc += bk * x[n - k];
                }
            }
            for (k, &ak) in self.a.iter().enumerate().skip(1) {
                if n >= k {
                    acc -= ak * y[n - k];
                }
            }
            y[n] = acc / a0;
        }

        Signal::new(y, signal.sample_rate())
    }

    /// Magnitude of the current coefficient form at `frequency`, in dB.
    pub fn magnitude_db_at(&self, frequency: f64) -> Result<f64> {
        if self.b.is_empty() || self.a.is_empty() {
            return Err(SigweaveError::MissingCoefficients {
                reason: "filter has no definition".to_string(),
            });
        }
        Ok(transfer_magnitude_db(
            &self.b,
            &self.a,
            self.sample_rate,
            frequency,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
