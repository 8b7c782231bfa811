//! Loading `SwitcherSettings` from TOML and JSON files.
//!
//! Run:
//!   cargo test -p dashswitch-runtime --features config-file --test settings_file

use std::io::Write;

use dashswitch_runtime::{ConfigError, SwitcherSettings};

#[test]
fn toml_overrides_merge_with_defaults() {
    let settings = SwitcherSettings::from_toml_str(
        r#"
        default_view_interval_ms = 30000
        pane_container_selector = ".grid li"
        "#,
    )
    .expect("valid toml");
    assert_eq!(settings.default_view_interval_ms, 30_000);
    assert_eq!(settings.pane_container_selector, ".grid li");
    assert_eq!(settings.default_pane_interval_ms, 5_000);
    assert_eq!(settings.controls_mount_id, "dc-switcher-controls");
}

#[test]
fn toml_file_is_read_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "countdown_step_ms = 500").expect("write");
    let settings = SwitcherSettings::from_toml_file(file.path()).expect("load");
    assert_eq!(settings.countdown_step_ms, 500);
}

#[test]
fn json_round_trips_defaults() {
    let json = serde_json::to_string(&SwitcherSettings::default()).expect("serialize");
    let settings = SwitcherSettings::from_json_str(&json).expect("parse");
    assert_eq!(settings, SwitcherSettings::default());
}

#[test]
fn invalid_values_are_rejected() {
    let err = SwitcherSettings::from_json_str(r#"{ "countdown_step_ms": 0 }"#)
        .expect_err("zero step");
    assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
    assert!(err.to_string().contains("countdown_step_ms"));
}

#[test]
fn malformed_input_reports_parse_errors() {
    assert!(matches!(
        SwitcherSettings::from_toml_str("default_view_interval_ms = "),
        Err(ConfigError::Toml(_))
    ));
    assert!(matches!(
        SwitcherSettings::from_json_str("{"),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = SwitcherSettings::from_toml_file(dir.path().join("absent.toml"))
        .expect_err("missing");
    assert!(matches!(err, ConfigError::Io(_)));
}
