//! Loading model dumps from disk and checking them against the schema.

mod common;

use std::io::Write;

use common::{model_dump, schema_names, still_request};
use movement_classifier::{
    handle_predict_movement, load_model, AppConfig, ClassifierError, Classifier, GbdtModel,
    ModelHandle, PipelineConfig, Predictor, FEATURE_COUNT,
};
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_model_from_file() {
    let file = write_temp(&model_dump(&schema_names()).to_string());
    let handle = load_model(file.path());
    assert!(handle.is_loaded());

    let model = handle.get().unwrap();
    assert_eq!(model.n_features(), FEATURE_COUNT);
    assert_eq!(model.n_classes(), 3);
    assert_eq!(model.feature_names().map(<[String]>::len), Some(FEATURE_COUNT));

    let predictor = Predictor::new(handle, PipelineConfig::default()).unwrap();
    let response = handle_predict_movement(&predictor, &still_request(10, 500).to_string());
    assert_eq!(response.status, 200);
}

#[test]
fn test_missing_file_gives_unavailable_handle() {
    let dir = tempfile::tempdir().unwrap();
    let handle = load_model(&dir.path().join("absent.json"));
    assert!(!handle.is_loaded());
    assert!(matches!(handle.get(), Err(ClassifierError::ModelUnavailable(_))));

    let predictor = Predictor::new(handle, PipelineConfig::default()).unwrap();
    let response = handle_predict_movement(&predictor, &still_request(10, 500).to_string());
    assert_eq!(response.status, 503);
}

#[test]
fn test_corrupt_file_gives_unavailable_handle() {
    let file = write_temp("{\"num_class\": 3, \"tree_info\": [");
    assert!(matches!(load_model(file.path()), ModelHandle::Unavailable(_)));
}

#[test]
fn test_from_file_reports_load_errors() {
    let file = write_temp("not a model");
    let err = GbdtModel::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ClassifierError::ModelLoad(_)));
}

#[test]
fn test_binary_objective_rejected() {
    let mut dump = model_dump(&schema_names());
    dump["objective"] = serde_json::json!("binary sigmoid:1");
    let err = GbdtModel::from_json_str(&dump.to_string()).unwrap_err();
    assert!(matches!(err, ClassifierError::ModelLoad(_)));
}

// ============================================================================
// Schema checks at startup
// ============================================================================

#[test]
fn test_wrong_feature_count_rejected_at_startup() {
    let mut names = schema_names();
    names.pop();
    let model = GbdtModel::from_json_str(&model_dump(&names).to_string()).unwrap();
    assert_eq!(model.n_features(), FEATURE_COUNT - 1);

    let result = Predictor::new(ModelHandle::from_classifier(model), PipelineConfig::default());
    assert!(matches!(result, Err(ClassifierError::SchemaMismatch(_))));
}

#[test]
fn test_reordered_features_rejected_at_startup() {
    let mut names = schema_names();
    names.swap(33, 34);
    let model = GbdtModel::from_json_str(&model_dump(&names).to_string()).unwrap();

    let result = Predictor::new(ModelHandle::from_classifier(model), PipelineConfig::default());
    match result {
        Err(ClassifierError::SchemaMismatch(msg)) => assert!(msg.contains("lat_diff")),
        other => panic!("expected schema mismatch, got {other:?}"),
    }
}

// ============================================================================
// Config file
// ============================================================================

#[test]
fn test_config_file_points_at_model() {
    let model_file = write_temp(&model_dump(&schema_names()).to_string());
    let config_text = format!(
        "[model]\npath = {:?}\n\n[pipeline]\ndefault_interval_ms = 250.0\n",
        model_file.path().display().to_string()
    );
    let config_file = write_temp(&config_text);

    let config = AppConfig::load(config_file.path()).unwrap();
    assert_eq!(config.pipeline.default_interval_ms, 250.0);

    let handle = load_model(&config.model.path);
    assert!(handle.is_loaded());
}
