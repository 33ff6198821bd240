//! FFT-based frequency descriptors for one acceleration axis.
//!
//! The signal is transformed with an N-point FFT. Only strictly positive
//! frequency bins are kept, laid out the way a two-sided spectrum labels
//! them: bin `k` sits at `k * fs / N` for `k = 1 ..= (N - 1) / 2`. For even
//! N the Nyquist bin is treated as a negative frequency and dropped.
//!
//! ## Descriptors
//!
//! - **dominant frequency**: frequency of the first bin with the largest
//!   magnitude
//! - **mean frequency**: power-weighted mean, `sum(f * |X|^2) / sum(|X|^2)`

use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::error::{ClassifierError, Result};

/// Spectral descriptors of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralFeatures {
    /// Power-weighted mean frequency (Hz).
    pub mean_freq: f64,
    /// Frequency of the strongest positive bin (Hz).
    pub dominant_freq: f64,
}

/// Shortest signal with a strictly positive frequency bin.
pub const MIN_SPECTRAL_SAMPLES: usize = 3;

/// Number of strictly positive frequency bins of an N-point spectrum.
#[must_use]
pub const fn positive_bin_count(n: usize) -> usize {
    n.saturating_sub(1) / 2
}

/// Magnitudes and frequencies of the strictly positive bins.
///
/// # Errors
///
/// Returns [`ClassifierError::InsufficientSamples`] if the signal is too
/// short to have a positive bin (N < [`MIN_SPECTRAL_SAMPLES`]).
pub fn positive_spectrum(signal: &[f64], sampling_hz: f64) -> Result<(Vec<f64>, Vec<f64>)> {
    let n = signal.len();
    let n_positive = positive_bin_count(n);
    if n_positive == 0 {
        return Err(ClassifierError::insufficient_samples(MIN_SPECTRAL_SAMPLES, n));
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    fft.process(&mut buffer);

    let bin_width = sampling_hz / n as f64;
    let frequencies = (1..=n_positive).map(|k| k as f64 * bin_width).collect();
    let magnitudes = buffer[1..=n_positive].iter().map(|c| c.norm()).collect();

    Ok((frequencies, magnitudes))
}

/// Compute mean and dominant frequency of one axis.
///
/// `interval_ms` is the sampling interval; the sampling frequency is
/// `1000 / interval_ms`. A signal with no power in any positive bin (a
/// constant axis) has a mean frequency of 0.
///
/// # Errors
///
/// Returns an error if the signal has no positive frequency bin or the
/// result is not finite.
pub fn compute_spectral_features(signal: &[f64], interval_ms: f64) -> Result<SpectralFeatures> {
    let sampling_hz = 1000.0 / interval_ms;
    let (frequencies, magnitudes) = positive_spectrum(signal, sampling_hz)?;

    let mut dominant = 0;
    for (k, &mag) in magnitudes.iter().enumerate().skip(1) {
        if mag > magnitudes[dominant] {
            dominant = k;
        }
    }

    let (weighted, total_power) = frequencies
        .iter()
        .zip(magnitudes.iter())
        .fold((0.0, 0.0), |(weighted, total), (&f, &m)| {
            let power = m * m;
            (weighted + f * power, total + power)
        });

    let mean_freq = if total_power > 0.0 {
        weighted / total_power
    } else {
        0.0
    };

    let features = SpectralFeatures {
        mean_freq,
        dominant_freq: frequencies[dominant],
    };

    if !features.mean_freq.is_finite() || !features.dominant_freq.is_finite() {
        return Err(ClassifierError::internal(format!(
            "non-finite spectral features for {} samples at {interval_ms} ms",
            signal.len()
        )));
    }

    Ok(features)
}
