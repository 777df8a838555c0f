use std::path::PathBuf;

use parallax_portal::config::Config;
use parallax_portal::error::ConfigError;

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("parallax-portal-{}-{}.json", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_overrides_selected_fields() {
    let path = write_temp(
        "override",
        r#"{
            "estimator": { "stride": 2, "min_samples": 20 },
            "tracking": { "default_distance": 5.0 },
            "capture": { "camera_index": 1 }
        }"#,
    );
    let config = Config::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.estimator.stride, 2);
    assert_eq!(config.estimator.min_samples, 20);
    assert_eq!(config.estimator.min_red, 60);
    assert_eq!(config.tracking.default_distance, 5.0);
    assert_eq!(config.capture.camera_index, 1);
    assert_eq!(config.capture.width, 320);
}

#[test]
fn test_invalid_values_are_rejected_with_field_name() {
    let path = write_temp("invalid", r#"{ "smoothing": { "depth": 1.5 } }"#);
    let err = Config::load(&path).unwrap_err();
    std::fs::remove_file(&path).ok();

    let config_error = err.downcast_ref::<ConfigError>().expect("typed config error");
    assert!(matches!(config_error, ConfigError::Invalid { field: "smoothing.depth", .. }));
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(Config::load("/definitely/not/here.json").is_err());
}

#[test]
fn test_malformed_json_is_an_error() {
    assert!(Config::from_json("{ not json").is_err());
}

#[test]
fn test_defaults_round_trip_through_json() {
    let text = serde_json::to_string(&Config::default()).unwrap();
    assert_eq!(Config::from_json(&text).unwrap(), Config::default());
}
