use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

use durable_write::config::{load_config_from_xml, load_or_init, LoadResult, CONFIG_ENV};
use durable_write::{default_config_path, LogLevel};

struct EnvGuard;

impl EnvGuard {
    fn set(value: &std::path::Path) -> Self {
        // Serialized via #[serial]; no other thread reads the environment meanwhile.
        unsafe { std::env::set_var(CONFIG_ENV, value) };
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe { std::env::remove_var(CONFIG_ENV) };
    }
}

#[test]
#[serial]
fn env_override_wins_for_config_path() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("custom_config.xml");
    let _env = EnvGuard::set(&cfg);

    assert_eq!(default_config_path(), Some(cfg));
}

#[test]
#[serial]
fn env_config_values_are_loaded() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("config.xml");
    fs::write(
        &cfg,
        "<config>\n  <log_level>quiet</log_level>\n  <default_mode>0640</default_mode>\n  <retry_attempts>4</retry_attempts>\n  <retry_delay_ms>25</retry_delay_ms>\n</config>\n",
    )
    .unwrap();
    let _env = EnvGuard::set(&cfg);

    let loaded = load_config_from_xml().unwrap().expect("config present");
    assert_eq!(loaded.log_level, LogLevel::Quiet);
    assert_eq!(loaded.default_mode, 0o640);
    assert_eq!(loaded.retry_attempts, 4);
    assert_eq!(loaded.retry_delay, Duration::from_millis(25));

    match load_or_init().unwrap() {
        LoadResult::Loaded(c) => assert_eq!(c.retry_attempts, 4),
        other => panic!("expected Loaded, got {other:?}"),
    }
}

#[test]
#[serial]
fn env_pointing_to_missing_file_errors_without_template() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("nope.xml");
    let _env = EnvGuard::set(&cfg);

    assert!(load_config_from_xml().unwrap().is_none());
    assert!(load_or_init().is_err());
    assert!(!cfg.exists());
}

#[test]
#[serial]
fn unknown_fields_are_rejected() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("config.xml");
    fs::write(&cfg, "<config>\n  <download_base>/x</download_base>\n</config>\n").unwrap();
    let _env = EnvGuard::set(&cfg);

    assert!(load_config_from_xml().is_err());
}

#[test]
#[serial]
fn out_of_range_mode_is_rejected() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("config.xml");
    fs::write(&cfg, "<config><default_mode>99999</default_mode></config>").unwrap();
    let _env = EnvGuard::set(&cfg);

    let err = load_config_from_xml().unwrap_err();
    assert!(format!("{err:#}").contains("invalid octal mode"), "got: {err:#}");
}
