//! Feature extraction pipeline.
//!
//! This module implements [`extract_features`], which turns a validated
//! [`SensorWindow`] into the [`FeatureVector`] the model was trained on.
//!
//! # Pipeline Overview
//!
//! 1. Rotate acceleration (with and without gravity) into the world frame
//! 2. Per-axis statistics of rotated acceleration
//! 3. Per-axis means of rotated gravity-inclusive acceleration
//! 4. Statistics of the raw `gyro_z` field
//! 5. Mean magnitude and signal magnitude area
//! 6. Per-axis spectral descriptors
//! 7. GPS displacement between first and last sample
//! 8. Assemble in schema order and reject non-finite values

use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::{ClassifierError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::math::{
    fft::compute_spectral_features,
    rotation::{acc_axis, gravity_axis, rotate_window},
    stats::{self, AxisStats},
};
use crate::window::SensorWindow;

/// Statistics of the raw `gyro_z` column: `[mean, std, max, min]`.
///
/// The field holds roll in degrees; it is used as-is, without rotation.
///
/// # Errors
///
/// Returns an error if the window has fewer than two samples.
pub fn gyro_z_stats(window: &SensorWindow) -> Result<[f64; 4]> {
    let gyro_z: Vec<f64> = window.samples().iter().map(|s| s.gyro_z).collect();
    Ok([
        stats::mean(&gyro_z)?,
        stats::sample_std(&gyro_z)?,
        stats::max(&gyro_z)?,
        stats::min(&gyro_z)?,
    ])
}

/// Start-minus-end GPS deltas `[lat_diff, lon_diff]` in degrees.
///
/// Positive values mean the window started further north / east than it
/// ended.
#[must_use]
pub fn displacement(window: &SensorWindow) -> [f64; 2] {
    let (first, last) = (window.first(), window.last());
    [first.gps_lat - last.gps_lat, first.gps_lon - last.gps_lon]
}

/// Sum of absolute per-axis means.
#[must_use]
pub fn signal_magnitude_area(axis_means: [f64; 3]) -> f64 {
    axis_means.iter().map(|m| m.abs()).sum()
}

/// Compute the full feature vector for a window.
///
/// # Errors
///
/// Returns an error if any stage fails (for example a window too short for
/// spectral analysis) or the assembled vector contains a non-finite value.
/// No partial vector is ever returned.
pub fn extract_features(window: &SensorWindow, config: &PipelineConfig) -> Result<FeatureVector> {
    // =========================================================================
    // 1. ORIENTATION TRANSFORM
    // =========================================================================
    let rotated = rotate_window(window, config.euler_convention);
    let axes: [Vec<f64>; 3] = [
        acc_axis(&rotated, 0),
        acc_axis(&rotated, 1),
        acc_axis(&rotated, 2),
    ];

    // =========================================================================
    // 2. PER-AXIS STATISTICS
    // =========================================================================
    let axis_stats = [
        AxisStats::from_values(&axes[0])?,
        AxisStats::from_values(&axes[1])?,
        AxisStats::from_values(&axes[2])?,
    ];

    // =========================================================================
    // 3. GRAVITY-INCLUSIVE MEANS
    // =========================================================================
    let gravity_means = [
        stats::mean(&gravity_axis(&rotated, 0))?,
        stats::mean(&gravity_axis(&rotated, 1))?,
        stats::mean(&gravity_axis(&rotated, 2))?,
    ];

    // =========================================================================
    // 4. RAW GYRO-Z
    // =========================================================================
    let gyro_z = gyro_z_stats(window)?;

    // =========================================================================
    // 5. MAGNITUDE AGGREGATES
    // =========================================================================
    let magnitudes: Vec<f64> = rotated.iter().map(|r| r.magnitude).collect();
    let mean_magnitude = stats::mean(&magnitudes)?;
    let sma = signal_magnitude_area([
        axis_stats[0].mean,
        axis_stats[1].mean,
        axis_stats[2].mean,
    ]);

    // =========================================================================
    // 6. SPECTRAL DESCRIPTORS
    // =========================================================================
    let spectral = [
        compute_spectral_features(&axes[0], window.interval_ms())?,
        compute_spectral_features(&axes[1], window.interval_ms())?,
        compute_spectral_features(&axes[2], window.interval_ms())?,
    ];

    // =========================================================================
    // 7. DISPLACEMENT
    // =========================================================================
    let [lat_diff, lon_diff] = displacement(window);

    // =========================================================================
    // 8. ASSEMBLE
    // =========================================================================
    let mut values = Vec::with_capacity(FEATURE_COUNT);
    for s in &axis_stats {
        values.extend_from_slice(&s.to_array());
    }
    values.extend_from_slice(&gravity_means);
    values.extend_from_slice(&gyro_z);
    values.push(mean_magnitude);
    values.push(sma);
    for s in &spectral {
        values.push(s.mean_freq);
        values.push(s.dominant_freq);
    }
    values.push(lat_diff);
    values.push(lon_diff);

    let values: [f64; FEATURE_COUNT] = values.try_into().map_err(|v: Vec<f64>| {
        ClassifierError::internal(format!(
            "assembled {} features, schema expects {FEATURE_COUNT}",
            v.len()
        ))
    })?;
    let features = FeatureVector::from_array(values);

    if let Some(name) = features.first_non_finite() {
        return Err(ClassifierError::internal(format!(
            "feature '{name}' is not finite"
        )));
    }

    debug!(
        samples = window.len(),
        interval_ms = window.interval_ms(),
        mean_magnitude,
        "extracted feature vector"
    );

    Ok(features)
}
