//! Sensor window data structures and request ingestion.
//!
//! A [`SensorWindow`] is the unit of classification: an ordered batch of
//! synchronized [`SensorSample`]s plus the sampling interval. Windows are
//! built from a request body with [`SensorWindow::from_request`], which
//! rejects malformed input before any numeric work happens.
//!
//! # Request layout
//!
//! ```json
//! {
//!   "data": [ { "timestamp": 0, "time_imu": 0.0, "time_gps": 0.0,
//!               "acc_x": 0.0, "acc_y": 0.0, "acc_z": 9.8,
//!               "acc_gx": 0.0, "acc_gy": 0.0, "acc_gz": 0.0,
//!               "gyro_x": 0.0, "gyro_y": 0.0, "gyro_z": 0.0,
//!               "gps_lat": 0.0, "gps_lon": 0.0 }, ... ],
//!   "interval": 500
//! }
//! ```
//!
//! The `gyro_*` fields carry orientation angles in degrees (yaw, pitch,
//! roll), not angular rates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::PipelineConfig;
use crate::error::{ClassifierError, Result};

/// Minimum number of samples in a window.
pub const MIN_SAMPLES: usize = 2;

/// Numeric fields every sample record must carry, in record order.
pub const NUMERIC_FIELDS: [&str; 13] = [
    "time_imu", "time_gps", "acc_x", "acc_y", "acc_z", "acc_gx", "acc_gy", "acc_gz", "gyro_x",
    "gyro_y", "gyro_z", "gps_lat", "gps_lon",
];

/// Wall-clock timestamp of a sample.
///
/// Clients send either epoch milliseconds or an ISO-8601 string. The value
/// is carried through untouched and never used in feature computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Numeric timestamp.
    Numeric(f64),
    /// Textual timestamp.
    Text(String),
}

/// One synchronized IMU + GPS reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub timestamp: Timestamp,
    /// Device-relative IMU capture time.
    pub time_imu: f64,
    /// Device-relative GPS capture time.
    pub time_gps: f64,
    /// Body-frame acceleration without gravity (m/s²).
    pub acc_x: f64,
    pub acc_y: f64,
    pub acc_z: f64,
    /// Body-frame acceleration including gravity (m/s²).
    pub acc_gx: f64,
    pub acc_gy: f64,
    pub acc_gz: f64,
    /// Yaw in degrees.
    pub gyro_x: f64,
    /// Pitch in degrees.
    pub gyro_y: f64,
    /// Roll in degrees.
    pub gyro_z: f64,
    /// Latitude in degrees.
    pub gps_lat: f64,
    /// Longitude in degrees.
    pub gps_lon: f64,
}

impl SensorSample {
    /// Body-frame acceleration `[x, y, z]` without gravity.
    #[must_use]
    pub const fn acceleration(&self) -> [f64; 3] {
        [self.acc_x, self.acc_y, self.acc_z]
    }

    /// Body-frame acceleration `[x, y, z]` including gravity.
    #[must_use]
    pub const fn gravity_acceleration(&self) -> [f64; 3] {
        [self.acc_gx, self.acc_gy, self.acc_gz]
    }

    /// Orientation angles `[yaw, pitch, roll]` in degrees.
    #[must_use]
    pub const fn orientation_deg(&self) -> [f64; 3] {
        [self.gyro_x, self.gyro_y, self.gyro_z]
    }

    /// Build a sample from one JSON record, naming the first bad field.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::MalformedSample`] if the record is not an
    /// object, or any required field is missing or has the wrong type.
    pub fn from_record(index: usize, record: &Value) -> Result<Self> {
        let obj = record
            .as_object()
            .ok_or_else(|| ClassifierError::malformed_sample(index, "*", "record is not an object"))?;

        let timestamp = match obj.get("timestamp") {
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Timestamp::Numeric)
                .ok_or_else(|| ClassifierError::malformed_sample(index, "timestamp", "is not representable"))?,
            Some(Value::String(s)) => Timestamp::Text(s.clone()),
            Some(_) => {
                return Err(ClassifierError::malformed_sample(
                    index,
                    "timestamp",
                    "must be a number or a string",
                ))
            }
            None => return Err(ClassifierError::malformed_sample(index, "timestamp", "is missing")),
        };

        let mut values = [0.0f64; NUMERIC_FIELDS.len()];
        for (slot, field) in values.iter_mut().zip(NUMERIC_FIELDS) {
            *slot = numeric_field(obj, index, field)?;
        }
        let [time_imu, time_gps, acc_x, acc_y, acc_z, acc_gx, acc_gy, acc_gz, gyro_x, gyro_y, gyro_z, gps_lat, gps_lon] =
            values;

        Ok(Self {
            timestamp,
            time_imu,
            time_gps,
            acc_x,
            acc_y,
            acc_z,
            acc_gx,
            acc_gy,
            acc_gz,
            gyro_x,
            gyro_y,
            gyro_z,
            gps_lat,
            gps_lon,
        })
    }
}

fn numeric_field(obj: &Map<String, Value>, index: usize, field: &str) -> Result<f64> {
    match obj.get(field) {
        None => Err(ClassifierError::malformed_sample(index, field, "is missing")),
        Some(value) => value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ClassifierError::malformed_sample(index, field, "is not a finite number")),
    }
}

/// An ordered batch of samples forming one classification unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorWindow {
    samples: Vec<SensorSample>,
    interval_ms: f64,
}

impl SensorWindow {
    /// Create a window from already-typed samples.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than [`MIN_SAMPLES`] samples are given or
    /// the interval is not a positive finite number with a finite sampling
    /// frequency.
    pub fn new(samples: Vec<SensorSample>, interval_ms: f64) -> Result<Self> {
        if !interval_ms.is_finite() || interval_ms <= 0.0 || !(1000.0 / interval_ms).is_finite() {
            return Err(ClassifierError::invalid_interval(format!(
                "expected a positive number of milliseconds, got {interval_ms}"
            )));
        }
        if samples.len() < MIN_SAMPLES {
            return Err(ClassifierError::insufficient_samples(MIN_SAMPLES, samples.len()));
        }
        Ok(Self {
            samples,
            interval_ms,
        })
    }

    /// Parse a window from a raw request body.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::InvalidJson`] if the body does not parse,
    /// otherwise any error of [`SensorWindow::from_request`].
    pub fn from_json_str(body: &str, config: &PipelineConfig) -> Result<Self> {
        let request: Value =
            serde_json::from_str(body).map_err(|e| ClassifierError::InvalidJson(e.to_string()))?;
        Self::from_request(&request, config)
    }

    /// Build a window from a decoded request object.
    ///
    /// # Errors
    ///
    /// - [`ClassifierError::MissingData`] if `data` is absent or not a list
    /// - [`ClassifierError::InvalidInterval`] if `interval` is not a positive number
    /// - [`ClassifierError::MalformedSample`] for the first bad record
    /// - [`ClassifierError::InsufficientSamples`] if fewer than two records
    pub fn from_request(request: &Value, config: &PipelineConfig) -> Result<Self> {
        let records = request
            .get("data")
            .and_then(Value::as_array)
            .ok_or(ClassifierError::MissingData)?;

        let interval_ms = match request.get("interval") {
            None | Some(Value::Null) => config.default_interval_ms,
            Some(value) => value.as_f64().ok_or_else(|| {
                ClassifierError::invalid_interval(format!("expected a number, got {value}"))
            })?,
        };

        let samples = records
            .iter()
            .enumerate()
            .map(|(i, record)| SensorSample::from_record(i, record))
            .collect::<Result<Vec<_>>>()?;

        Self::new(samples, interval_ms)
    }

    /// Samples in arrival order.
    #[must_use]
    pub fn samples(&self) -> &[SensorSample] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed window; kept for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sampling interval in milliseconds.
    #[must_use]
    pub const fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Sampling frequency in Hz.
    #[must_use]
    pub fn sampling_frequency(&self) -> f64 {
        1000.0 / self.interval_ms
    }

    /// First sample of the window.
    #[must_use]
    pub fn first(&self) -> &SensorSample {
        &self.samples[0]
    }

    /// Last sample of the window.
    #[must_use]
    pub fn last(&self) -> &SensorSample {
        &self.samples[self.samples.len() - 1]
    }
}
