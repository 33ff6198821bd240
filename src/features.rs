//! Feature vector schema shared with the trained model.
//!
//! The order of [`FEATURE_NAMES`] is a contract with the model artifact:
//! the model scores features by position, so any reordering, addition or
//! removal must bump [`FEATURE_SCHEMA_VERSION`] and ship with a retrained
//! model.
//!
//! # Layout (35 features)
//!
//! | Index | Feature | Dims | Description |
//! |-------|---------|------|-------------|
//! | 0:6 | x-axis stats | 6 | mean, median, std, min, max, mean abs of rotated acc x |
//! | 6:12 | y-axis stats | 6 | same for y |
//! | 12:18 | z-axis stats | 6 | same for z |
//! | 18:21 | gravity means | 3 | mean of rotated gravity-inclusive acc |
//! | 21:25 | gyro_z stats | 4 | mean, std, max, min of the raw roll field |
//! | 25 | mean_magnitude | 1 | mean norm of rotated acc |
//! | 26 | signal_magnitude_area | 1 | L1 norm of the rotated acc means |
//! | 27:33 | spectral | 6 | mean and dominant frequency per axis |
//! | 33:35 | displacement | 2 | first minus last latitude, longitude |

use serde::Serialize;

/// Version of the feature layout below.
pub const FEATURE_SCHEMA_VERSION: u32 = 4;

/// Number of features.
pub const FEATURE_COUNT: usize = 35;

/// Feature names in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "avg_acc_x",
    "median_acc_x",
    "std_acc_x",
    "min_x",
    "max_x",
    "mean_abs_x",
    "avg_acc_y",
    "median_acc_y",
    "std_acc_y",
    "min_y",
    "max_y",
    "mean_abs_y",
    "avg_acc_z",
    "median_acc_z",
    "std_acc_z",
    "min_z",
    "max_z",
    "mean_abs_z",
    "avg_acc_gx",
    "avg_acc_gy",
    "avg_acc_gz",
    "gyro_z_mean",
    "gyro_z_std",
    "gyro_z_max",
    "gyro_z_min",
    "mean_magnitude",
    "signal_magnitude_area",
    "mean_freq_x",
    "dominant_freq_x",
    "mean_freq_y",
    "dominant_freq_y",
    "mean_freq_z",
    "dominant_freq_z",
    "lat_diff",
    "lon_diff",
];

/// Position of a feature in the schema.
#[must_use]
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|&n| n == name)
}

/// A complete, finite feature vector in schema order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

/// One named entry, used for display and export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NamedFeature {
    pub name: &'static str,
    pub value: f64,
}

impl FeatureVector {
    /// Wrap values already in schema order.
    #[must_use]
    pub const fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Values in schema order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Values in schema order.
    #[must_use]
    pub const fn to_array(&self) -> [f64; FEATURE_COUNT] {
        self.values
    }

    /// Number of features; always [`FEATURE_COUNT`].
    #[must_use]
    pub const fn len(&self) -> usize {
        FEATURE_COUNT
    }

    /// Never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Look up a feature by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|i| self.values[i])
    }

    /// Name of the first non-finite feature, if any.
    #[must_use]
    pub fn first_non_finite(&self) -> Option<&'static str> {
        self.values
            .iter()
            .position(|v| !v.is_finite())
            .map(|i| FEATURE_NAMES[i])
    }

    /// Pair every value with its name, in schema order.
    #[must_use]
    pub fn named(&self) -> Vec<NamedFeature> {
        FEATURE_NAMES
            .iter()
            .zip(self.values.iter())
            .map(|(&name, &value)| NamedFeature { name, value })
            .collect()
    }
}
