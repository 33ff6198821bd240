//! Shared fixtures for integration tests.

#![allow(dead_code)]

use movement_classifier::FEATURE_NAMES;
use serde_json::{json, Value};

/// Build one sample record.
pub fn record(acc: [f64; 3], acc_g: [f64; 3], ori: [f64; 3], lat: f64, lon: f64) -> Value {
    json!({
        "timestamp": 0,
        "time_imu": 0.0,
        "time_gps": 0.0,
        "acc_x": acc[0], "acc_y": acc[1], "acc_z": acc[2],
        "acc_gx": acc_g[0], "acc_gy": acc_g[1], "acc_gz": acc_g[2],
        "gyro_x": ori[0], "gyro_y": ori[1], "gyro_z": ori[2],
        "gps_lat": lat, "gps_lon": lon
    })
}

/// A device lying flat and still.
pub fn still_request(n: usize, interval: u64) -> Value {
    let data: Vec<Value> = (0..n)
        .map(|_| record([0.0, 0.0, 9.8], [0.0, 0.0, 9.8], [0.0, 0.0, 0.0], 1.0, 2.0))
        .collect();
    json!({ "data": data, "interval": interval })
}

/// A walker bobbing at ~2 Hz while heading north.
pub fn walking_request(n: usize, interval: u64) -> Value {
    let fs = 1000.0 / interval as f64;
    let data: Vec<Value> = (0..n)
        .map(|i| {
            let t = i as f64 / fs;
            let bob = (2.0 * std::f64::consts::PI * 1.8 * t).sin();
            record(
                [0.4 * bob, 1.2 + 0.3 * bob, 2.0 * bob],
                [0.4 * bob, 1.2, 9.8 + 2.0 * bob],
                [3.0, 5.0, 1.0],
                10.0 - i as f64 * 1e-5,
                20.0,
            )
        })
        .collect();
    json!({ "data": data, "interval": interval })
}

/// A walker sweeping through a quarter turn.
pub fn turning_request(n: usize, interval: u64) -> Value {
    let data: Vec<Value> = (0..n)
        .map(|i| {
            let yaw = 90.0 * i as f64 / (n - 1) as f64;
            record(
                [0.8, 0.2, 0.5 * (i as f64).sin()],
                [0.8, 0.2, 9.8],
                [yaw, 2.0, yaw / 3.0],
                10.0,
                20.0 + i as f64 * 1e-6,
            )
        })
        .collect();
    json!({ "data": data, "interval": interval })
}

fn stump(feature: &str, threshold: f64, left: f64, right: f64) -> Value {
    let index = FEATURE_NAMES
        .iter()
        .position(|&n| n == feature)
        .expect("feature in schema");
    json!({
        "split_index": 0,
        "split_feature": index,
        "split_gain": 10.0,
        "threshold": threshold,
        "decision_type": "<=",
        "default_left": true,
        "missing_type": "None",
        "internal_value": 0,
        "internal_weight": 0,
        "internal_count": 100,
        "left_child": { "leaf_index": 0, "leaf_value": left, "leaf_weight": 1, "leaf_count": 50 },
        "right_child": { "leaf_index": 1, "leaf_value": right, "leaf_weight": 1, "leaf_count": 50 }
    })
}

/// A small LightGBM-style model dump over the given feature names.
pub fn model_dump(feature_names: &[String]) -> Value {
    let trees = vec![
        // iteration 0: Halt, Forward, Turn
        stump("std_acc_z", 0.05, 1.5, -0.5),
        stump("std_acc_z", 0.05, -0.5, 1.0),
        stump("gyro_z_std", 5.0, -0.5, 1.5),
        // iteration 1
        stump("mean_magnitude", 0.5, 0.3, -0.1),
        stump("lat_diff", 0.0, -0.2, 0.4),
        stump("std_acc_x", 0.1, -0.3, 0.2),
    ];
    let tree_info: Vec<Value> = trees
        .into_iter()
        .enumerate()
        .map(|(i, t)| json!({ "tree_index": i, "num_leaves": 2, "num_cat": 0, "shrinkage": 0.1, "tree_structure": t }))
        .collect();

    json!({
        "name": "tree",
        "version": "v3",
        "num_class": 3,
        "num_tree_per_iteration": 3,
        "label_index": 0,
        "max_feature_idx": feature_names.len() - 1,
        "objective": "multiclass num_class:3",
        "average_output": false,
        "feature_names": feature_names,
        "tree_info": tree_info
    })
}

/// Schema feature names as owned strings.
pub fn schema_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(ToString::to_string).collect()
}
