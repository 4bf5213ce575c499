use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use coursebow::config::{Config, Overrides};
use coursebow::CourseError;

#[test]
fn loads_partial_toml_with_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_url = \"https://api.example.com/dev\"").unwrap();
    writeln!(file, "carousel_interval_ms = 2500").unwrap();

    let config = Config::load(Some(file.path()), Overrides::default()).unwrap();
    assert_eq!(config.api_url, "https://api.example.com/dev");
    assert_eq!(config.carousel_interval(), Duration::from_millis(2500));
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
}

#[test]
fn cli_overrides_file_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_url = \"https://api.example.com/dev\"").unwrap();
    writeln!(file, "log_dir = \"/var/log/coursebow\"").unwrap();

    let config = Config::load(
        Some(file.path()),
        Overrides {
            api_url: Some("http://127.0.0.1:9000".into()),
            log_dir: Some(PathBuf::from("tmp-logs")),
        },
    )
    .unwrap();
    assert_eq!(config.api_url, "http://127.0.0.1:9000");
    assert_eq!(config.log_dir, PathBuf::from("tmp-logs"));
}

#[test]
fn invalid_toml_is_a_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "carousel_interval_ms = \"soon\"").unwrap();

    let err = Config::load(Some(file.path()), Overrides::default()).unwrap_err();
    assert!(matches!(err, CourseError::Config { .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(Some(&dir.path().join("absent.toml")), Overrides::default()).unwrap_err();
    assert!(matches!(err, CourseError::Io(_)));
}
