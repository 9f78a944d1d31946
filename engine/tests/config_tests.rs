//! Config Tests - Loading Explorer Settings from Disk
//!
//! File-backed loading, key aliases and the error variants reported for
//! missing or malformed files.

use std::path::PathBuf;

use cosmic_explorer_engine::error::ExplorerError;
use cosmic_explorer_engine::galaxy::{CameraPreset, ExplorerConfig};

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "cosmic_explorer_{}_{name}.json",
        std::process::id()
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_from_file() {
    let path = write_temp(
        "full",
        r#"{
            "initial_params": {
                "count": 20000,
                "radius": 7.5,
                "branches": 3,
                "spin": -1.0,
                "randomness": 0.4,
                "randomnessPower": 2.0
            },
            "warp": { "duration_ms": 900, "depth_stretch": 10, "fov_widen": 30 },
            "belts": [ { "radius_factor": 1.1, "count": 50, "speed": 0.001 } ]
        }"#,
    );
    let config = ExplorerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.initial_params.count, 20_000);
    assert_eq!(config.initial_params.randomness_power, 2.0);
    assert_eq!(config.warp.duration_ms, 900.0);
    assert_eq!(config.warp.fov_widen, 30.0);
    assert_eq!(config.belts.len(), 1);
    assert_eq!(config.camera, ExplorerConfig::default().camera);
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("cosmic_explorer_does_not_exist.json");
    let err = ExplorerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ExplorerError::ConfigIo(_)));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let path = write_temp("malformed", "{ \"warp\": ");
    let err = ExplorerConfig::load(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, ExplorerError::ConfigParse(_)));
}

#[test]
fn test_out_of_range_params_in_file() {
    let path = write_temp("too_many", r#"{ "initial_params": { "count": 900000 } }"#);
    let err = ExplorerConfig::load(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(
        err,
        ExplorerError::InvalidParameters { field: "count", .. }
    ));
}

#[test]
fn test_preset_names_serialize_lowercase() {
    assert_eq!(serde_json::to_string(&CameraPreset::Top).unwrap(), "\"top\"");
    let side: CameraPreset = serde_json::from_str("\"side\"").unwrap();
    assert_eq!(side, CameraPreset::Side);
}
