//! Descriptive statistics over a single signal column.
//!
//! All functions take the samples of one axis in window order. Empty input
//! is rejected instead of producing NaN.

use crate::error::{ClassifierError, Result};

/// Six per-axis statistics in schema order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStats {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub mean_abs: f64,
}

impl AxisStats {
    /// Compute all six statistics for one axis.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two values are given.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        Ok(Self {
            mean: mean(values)?,
            median: median(values)?,
            std: sample_std(values)?,
            min: min(values)?,
            max: max(values)?,
            mean_abs: mean_abs(values)?,
        })
    }

    /// Statistics as an array in schema order.
    #[must_use]
    pub const fn to_array(&self) -> [f64; 6] {
        [self.mean, self.median, self.std, self.min, self.max, self.mean_abs]
    }
}

fn require_non_empty(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        Err(ClassifierError::insufficient_samples(1, 0))
    } else {
        Ok(())
    }
}

/// Arithmetic mean.
///
/// # Errors
///
/// Returns an error on empty input.
pub fn mean(values: &[f64]) -> Result<f64> {
    require_non_empty(values)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; the mean of the two middle values for an even count.
///
/// # Errors
///
/// Returns an error on empty input.
pub fn median(values: &[f64]) -> Result<f64> {
    require_non_empty(values)?;
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Bessel-corrected standard deviation.
///
/// # Errors
///
/// Returns [`ClassifierError::InsufficientSamples`] for fewer than two
/// values, where the estimator is undefined.
pub fn sample_std(values: &[f64]) -> Result<f64> {
    let n = values.len();
    if n < 2 {
        return Err(ClassifierError::insufficient_samples(2, n));
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Ok((ss / (n - 1) as f64).sqrt())
}

/// Minimum value.
///
/// # Errors
///
/// Returns an error on empty input.
pub fn min(values: &[f64]) -> Result<f64> {
    require_non_empty(values)?;
    Ok(values.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Maximum value.
///
/// # Errors
///
/// Returns an error on empty input.
pub fn max(values: &[f64]) -> Result<f64> {
    require_non_empty(values)?;
    Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Mean of absolute values.
///
/// # Errors
///
/// Returns an error on empty input.
pub fn mean_abs(values: &[f64]) -> Result<f64> {
    require_non_empty(values)?;
    Ok(values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_stats() {
        let values = [2.0, -4.0, 6.0, 8.0];
        let stats = AxisStats::from_values(&values).unwrap();
        assert_relative_eq!(stats.mean, 3.0);
        assert_relative_eq!(stats.median, 4.0);
        // deviations: -1, -7, 3, 5 -> ss = 84, / 3 = 28
        assert_relative_eq!(stats.std, 28.0f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(stats.min, -4.0);
        assert_relative_eq!(stats.max, 8.0);
        assert_relative_eq!(stats.mean_abs, 5.0);
        assert_eq!(stats.to_array()[1], stats.median);
    }

    #[test]
    fn test_median_odd() {
        assert_relative_eq!(median(&[5.0, 1.0, 3.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_std_of_constant_is_zero() {
        assert_eq!(sample_std(&[0.5; 10]).unwrap(), 0.0);
        assert_relative_eq!(sample_std(&[9.8; 10]).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_std_single_sample_rejected() {
        let err = sample_std(&[1.0]).unwrap_err();
        assert_eq!(err, ClassifierError::insufficient_samples(2, 1));
        assert!(AxisStats::from_values(&[1.0]).is_err());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(mean(&[]).is_err());
        assert!(median(&[]).is_err());
        assert!(min(&[]).is_err());
        assert!(max(&[]).is_err());
        assert!(mean_abs(&[]).is_err());
    }
}
