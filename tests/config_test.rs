//! Tests for loading the TOML config file.

use sharetoe::AppConfig;
use std::io::Write;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_loads_session_settings() {
    let file = write_config(
        r#"
log_filter = "debug"

[session]
search_depth = 5
computer_move_delay_secs = 0.25
"#,
    );
    let config = AppConfig::from_file(file.path()).unwrap();

    assert_eq!(config.log_filter(), "debug");
    assert_eq!(*config.session().search_depth(), 5);
    assert_eq!(config.session().computer_move_delay(), Duration::from_millis(250));
    assert_eq!(config.session().win_reset_delay(), Duration::from_millis(1500));
    assert_eq!(config.session().draw_reset_delay(), Duration::from_secs(2));
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = write_config("");
    assert_eq!(AppConfig::from_file(file.path()).unwrap(), AppConfig::default());
}

#[test]
fn test_rejects_excessive_depth() {
    let file = write_config("[session]\nsearch_depth = 12\n");
    let err = AppConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("search_depth 12"));
}

#[test]
fn test_rejects_malformed_toml() {
    let file = write_config("[session\n");
    assert!(AppConfig::from_file(file.path()).is_err());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(*config.session().search_depth(), 2);
}
