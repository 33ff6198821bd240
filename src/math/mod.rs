//! Numeric building blocks for feature extraction.
//!
//! This module provides:
//! - [`rotation`]: body-to-world orientation transform
//! - [`stats`]: per-axis descriptive statistics
//! - [`fft`]: FFT spectral descriptors

pub mod fft;
pub mod rotation;
pub mod stats;

pub use fft::{compute_spectral_features, SpectralFeatures};
pub use rotation::{rotate_sample, rotate_window, rotation_from_degrees, RotatedSample};
pub use stats::AxisStats;
