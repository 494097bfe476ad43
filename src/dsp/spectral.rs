//! Spectral primitives for filter design
//!
//! The narrow numeric seam behind `FilterModel`: transfer-function magnitude
//! evaluation and minimum-phase FIR design by real-cepstrum spectral
//! factorization. Everything here is pure math on slices; no engine types.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::dsp::filter::FrequencyPoint;
use crate::error::{Result, SigweaveError};

/// FFT length used for the minimum-phase design grid.
pub const DESIGN_FFT_SIZE: usize = 4096;

/// Tap count of designed minimum-phase FIR filters.
pub const DESIGN_FIR_TAPS: usize = 512;

/// Magnitude floor in dB.
///
/// Zero magnitude has no finite logarithm and infinities do not survive JSON
/// serialization, so all magnitudes are floored here.
pub const MAG_FLOOR_DB: f64 = -240.0;

const LN_10_OVER_20: f64 = core::f64::consts::LN_10 / 20.0;

/// Evaluate the magnitude of the rational transfer function
/// `H(z) = B(z)/A(z)` at a single frequency, in dB (floored at
/// [`MAG_FLOOR_DB`]).
pub fn transfer_magnitude_db(b: &[f64], a: &[f64], sample_rate: f64, frequency: f64) -> f64 {
    let omega = 2.0 * std::f64::consts::PI * frequency / sample_rate;
    let num = polynomial_at(b, omega);
    let den = polynomial_at(a, omega);
    let magnitude = num.norm() / den.norm();
    if magnitude <= 0.0 || !magnitude.is_finite() {
        MAG_FLOOR_DB
    } else {
        (20.0 * magnitude.log10()).max(MAG_FLOOR_DB)
    }
}

/// Evaluate `Σ c[k] e^{-jωk}`.
fn polynomial_at(coefficients: &[f64], omega: f64) -> Complex<f64> {
    coefficients
        .iter()
        .enumerate()
        .map(|(k, &c)| {
            let angle = -omega * k as f64;
            Complex::new(c * angle.cos(), c * angle.sin())
        })
        .sum()
}

/// Magnitude in dB of a piecewise-linear curve at `frequency`.
///
/// Linear interpolation in dB between breakpoints; the first magnitude is
/// held below the curve's minimum frequency, and everything above its
/// maximum frequency is treated as zero magnitude ([`MAG_FLOOR_DB`]). The
/// curve must be sorted by ascending frequency.
pub fn curve_magnitude_db(curve: &[FrequencyPoint], frequency: f64) -> f64 {
    let (first, last) = match (curve.first(), curve.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return MAG_FLOOR_DB,
    };

    if frequency <= first.frequency {
        return first.magnitude_db.max(MAG_FLOOR_DB);
    }
    if frequency > last.frequency {
        return MAG_FLOOR_DB;
    }

    let idx = curve
        .partition_point(|p| p.frequency < frequency)
        .min(curve.len() - 1);
    let hi = &curve[idx];
    let lo = &curve[idx - 1];
    let span = hi.frequency - lo.frequency;
    if span <= 0.0 {
        return hi.magnitude_db.max(MAG_FLOOR_DB);
    }
    let fraction = (frequency - lo.frequency) / span;
    let db = lo.magnitude_db + fraction * (hi.magnitude_db - lo.magnitude_db);
    db.max(MAG_FLOOR_DB)
}

/// Design a causal, stable, minimum-phase FIR filter whose magnitude
/// response matches the given curve.
///
/// Homomorphic construction: the curve is interpolated onto a uniform
/// 0..Nyquist grid of `DESIGN_FFT_SIZE/2 + 1` bins (truncation above Nyquist
/// falls out of the grid), the real cepstrum of the log magnitude is folded
/// onto the causal side, and the exponentiated spectrum is inverted back to
/// an impulse response truncated to `num_taps` taps.
pub fn minimum_phase_fir(
    curve: &[FrequencyPoint],
    sample_rate: f64,
    num_taps: usize,
) -> Result<Vec<f64>> {
    if curve.len() < 2 {
        return Err(SigweaveError::CurveTooShort {
            points: curve.len(),
        });
    }

    let n = DESIGN_FFT_SIZE;
    let half = n / 2;
    let nyquist = sample_rate / 2.0;

    // Symmetric log-magnitude spectrum from the interpolated grid.
    let mut log_mag = vec![0.0_f64; n];
    for k in 0..=half {
        let frequency = k as f64 * nyquist / half as f64;
        log_mag[k] = curve_magnitude_db(curve, frequency) * LN_10_OVER_20;
    }
    for k in (half + 1)..n {
        log_mag[k] = log_mag[n - k];
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);

    // Real cepstrum of the log magnitude.
    let mut buffer: Vec<Complex<f64>> =
        log_mag.iter().map(|&v| Complex::new(v, 0.0)).collect();
    ifft.process(&mut buffer);
    let cepstrum: Vec<f64> = buffer.iter().map(|c| c.re / n as f64).collect();

    // Fold the anticausal part onto the causal side.
    let mut folded = vec![Complex::new(0.0, 0.0); n];
    folded[0] = Complex::new(cepstrum[0], 0.0);
    folded[half] = Complex::new(cepstrum[half], 0.0);
    for k in 1..half {
        folded[k] = Complex::new(2.0 * cepstrum[k], 0.0);
    }

    // Back to the spectral domain and exponentiate.
    fft.process(&mut folded);
    for value in folded.iter_mut() {
        *value = value.exp();
    }

    // Impulse response, truncated.
    ifft.process(&mut folded);
    let taps = num_taps.min(n);
    Ok(folded.iter().take(taps).map(|c| c.re / n as f64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn point(frequency: f64, magnitude_db: f64) -> FrequencyPoint {
        FrequencyPoint {
            frequency,
            magnitude_db,
        }
    }

    #[test]
    fn test_transfer_magnitude_two_tap_averager() {
        let b = [0.5, 0.5];
        let a = [1.0];
        // DC passes at unity
        assert_abs_diff_eq!(transfer_magnitude_db(&b, &a, 48000.0, 0.0), 0.0, epsilon = 1e-9);
        // Quarter band: |0.5 - 0.5j| = 1/sqrt(2)
        assert_abs_diff_eq!(
            transfer_magnitude_db(&b, &a, 48000.0, 12000.0),
            -3.0103,
            epsilon = 1e-3
        );
        // Nyquist null hits the floor
        assert_eq!(transfer_magnitude_db(&b, &a, 48000.0, 24000.0), MAG_FLOOR_DB);
    }

    #[test]
    fn test_curve_interpolation() {
        let curve = vec![point(0.0, 0.0), point(1000.0, -20.0)];
        assert_abs_diff_eq!(curve_magnitude_db(&curve, 500.0), -10.0, epsilon = 1e-9);
        // Held flat below the first breakpoint
        assert_abs_diff_eq!(curve_magnitude_db(&curve, 0.0), 0.0, epsilon = 1e-9);
        // Zero magnitude above the last breakpoint
        assert_eq!(curve_magnitude_db(&curve, 2000.0), MAG_FLOOR_DB);
    }

    #[test]
    fn test_flat_curve_designs_to_impulse() {
        let curve = vec![point(0.0, 0.0), point(24000.0, 0.0)];
        let taps = minimum_phase_fir(&curve, 48000.0, DESIGN_FIR_TAPS).unwrap();
        assert_eq!(taps.len(), DESIGN_FIR_TAPS);
        assert_abs_diff_eq!(taps[0], 1.0, epsilon = 1e-6);
        for &tap in &taps[1..] {
            assert!(tap.abs() < 1e-6, "tail tap {} too large", tap);
        }
    }

    #[test]
    fn test_flat_attenuation_designs_to_scaled_impulse() {
        let curve = vec![point(0.0, -6.0206), point(24000.0, -6.0206)];
        let taps = minimum_phase_fir(&curve, 48000.0, DESIGN_FIR_TAPS).unwrap();
        assert_abs_diff_eq!(taps[0], 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_tilt_curve_magnitude_match() {
        // Gentle 0 -> -40 dB tilt across the band
        let curve = vec![point(0.0, 0.0), point(24000.0, -40.0)];
        let taps = minimum_phase_fir(&curve, 48000.0, DESIGN_FIR_TAPS).unwrap();
        let a = [1.0];
        for &(frequency, expected_db) in
            &[(6000.0, -10.0), (12000.0, -20.0), (18000.0, -30.0)]
        {
            let actual = transfer_magnitude_db(&taps, &a, 48000.0, frequency);
            assert!(
                (actual - expected_db).abs() < 1.0,
                "at {} Hz: designed {} dB, expected {} dB",
                frequency,
                actual,
                expected_db
            );
        }
    }

    #[test]
    fn test_too_short_curve_rejected() {
        let curve = vec![point(0.0, 0.0)];
        let result = minimum_phase_fir(&curve, 48000.0, 32);
        assert!(matches!(result, Err(SigweaveError::CurveTooShort { points: 1 })));
    }
}
