//! Synthetic request windows for smoke tests and manual checks.
//!
//! The generated walk drifts slowly on every axis and moves the GPS fix
//! north-west, one sample per second of wall clock. Timestamps are
//! ISO-8601 UTC strings.

use chrono::{DateTime, SecondsFormat};
use serde_json::{json, Value};

use crate::window::{SensorSample, Timestamp};

/// 2024-06-07T10:00:00Z in epoch seconds.
const START_EPOCH_SECS: i64 = 1_717_754_400;

/// ISO-8601 UTC timestamp `offset_secs` after the start of the walk.
fn iso_timestamp(offset_secs: i64) -> Timestamp {
    let secs = START_EPOCH_SECS.saturating_add(offset_secs);
    match DateTime::from_timestamp(secs, 0) {
        Some(time) => Timestamp::Text(time.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => Timestamp::Numeric(secs as f64 * 1000.0),
    }
}

/// Generate `n` synthetic samples.
#[must_use]
pub fn mock_samples(n: usize) -> Vec<SensorSample> {
    (0..n)
        .map(|i| {
            let k = i as f64;
            SensorSample {
                timestamp: iso_timestamp(i64::try_from(i).unwrap_or(i64::MAX)),
                time_imu: 1000.123 + k,
                time_gps: 1000.456 + k,
                acc_x: 0.1 + k * 0.005,
                acc_y: 0.05 + k * 0.003,
                acc_z: 9.8 + k * 0.001,
                acc_gx: 0.01 + k * 0.0001,
                acc_gy: 0.02 + k * 0.0002,
                acc_gz: 0.03 + k * 0.0003,
                gyro_x: 0.001 + k * 0.000_01,
                gyro_y: 0.002 + k * 0.000_02,
                gyro_z: 0.003 + k * 0.000_03,
                gps_lat: 34.0522 + k * 0.0001,
                gps_lon: -118.2437 - k * 0.000_15,
            }
        })
        .collect()
}

/// Generate a complete request body with `n` samples.
#[must_use]
pub fn mock_request(n: usize, interval_ms: u64) -> Value {
    json!({
        "interval": interval_ms,
        "data": mock_samples(n),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::window::SensorWindow;
    use approx::assert_relative_eq;

    #[test]
    fn test_mock_request_parses() {
        let request = mock_request(10, 500);
        let window = SensorWindow::from_request(&request, &PipelineConfig::default()).unwrap();
        assert_eq!(window.len(), 10);
        assert_eq!(window.interval_ms(), 500.0);
        for (parsed, generated) in window.samples().iter().zip(mock_samples(10)) {
            assert_relative_eq!(parsed.acc_x, generated.acc_x, epsilon = 1e-12);
            assert_relative_eq!(parsed.gps_lon, generated.gps_lon, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_mock_timestamps_are_iso_strings() {
        let samples = mock_samples(3);
        assert_eq!(samples[0].timestamp, Timestamp::Text("2024-06-07T10:00:00Z".into()));
        assert_eq!(samples[2].timestamp, Timestamp::Text("2024-06-07T10:00:02Z".into()));

        let request = mock_request(3, 500);
        assert_eq!(request["data"][1]["timestamp"], "2024-06-07T10:00:01Z");
        let window = SensorWindow::from_request(&request, &PipelineConfig::default()).unwrap();
        assert_eq!(window.first().timestamp, samples[0].timestamp);
    }

    #[test]
    fn test_mock_walks_north_west() {
        let samples = mock_samples(5);
        assert!(samples[4].gps_lat > samples[0].gps_lat);
        assert!(samples[4].gps_lon < samples[0].gps_lon);
    }
}
