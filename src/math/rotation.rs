//! Orientation transform from body frame to an approximate world frame.
//!
//! Each sample carries yaw, pitch and roll in degrees. The angles are turned
//! into a rotation with nalgebra and applied to both acceleration vectors of
//! that sample.

use nalgebra::{Rotation3, Vector3};

use crate::config::EulerConvention;
use crate::window::{SensorSample, SensorWindow};

/// World-frame acceleration of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedSample {
    /// Rotated acceleration without gravity `[x, y, z]`.
    pub acc: [f64; 3],

    /// Rotated acceleration including gravity `[x, y, z]`.
    pub acc_gravity: [f64; 3],

    /// Euclidean norm of `acc`.
    pub magnitude: f64,
}

/// Build the rotation for yaw, pitch and roll given in degrees.
#[must_use]
pub fn rotation_from_degrees(
    yaw_deg: f64,
    pitch_deg: f64,
    roll_deg: f64,
    convention: EulerConvention,
) -> Rotation3<f64> {
    let (yaw, pitch, roll) = (yaw_deg.to_radians(), pitch_deg.to_radians(), roll_deg.to_radians());
    match convention {
        // nalgebra composes roll, then pitch, then yaw about fixed axes,
        // which is Rz * Ry * Rx: the body-fixed Z-Y-X sequence.
        EulerConvention::IntrinsicZyx => Rotation3::from_euler_angles(roll, pitch, yaw),
        EulerConvention::ExtrinsicZyx => {
            Rotation3::from_axis_angle(&Vector3::x_axis(), roll)
                * Rotation3::from_axis_angle(&Vector3::y_axis(), pitch)
                * Rotation3::from_axis_angle(&Vector3::z_axis(), yaw)
        }
    }
}

/// Rotate a single sample into the world frame.
#[must_use]
pub fn rotate_sample(sample: &SensorSample, convention: EulerConvention) -> RotatedSample {
    let [yaw, pitch, roll] = sample.orientation_deg();
    let rotation = rotation_from_degrees(yaw, pitch, roll, convention);

    let acc = rotation * Vector3::from(sample.acceleration());
    let acc_gravity = rotation * Vector3::from(sample.gravity_acceleration());

    RotatedSample {
        acc: acc.into(),
        acc_gravity: acc_gravity.into(),
        magnitude: acc.norm(),
    }
}

/// Rotate every sample of a window, preserving order.
#[must_use]
pub fn rotate_window(window: &SensorWindow, convention: EulerConvention) -> Vec<RotatedSample> {
    window
        .samples()
        .iter()
        .map(|s| rotate_sample(s, convention))
        .collect()
}

/// Column of rotated acceleration for one axis (0 = x, 1 = y, 2 = z).
#[must_use]
pub fn acc_axis(rotated: &[RotatedSample], axis: usize) -> Vec<f64> {
    debug_assert!(axis < 3);
    rotated.iter().map(|r| r.acc[axis]).collect()
}

/// Column of rotated gravity-inclusive acceleration for one axis.
#[must_use]
pub fn gravity_axis(rotated: &[RotatedSample], axis: usize) -> Vec<f64> {
    debug_assert!(axis < 3);
    rotated.iter().map(|r| r.acc_gravity[axis]).collect()
}
