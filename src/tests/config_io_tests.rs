use std::{
    fs,
    path::PathBuf,
    sync::{Mutex, OnceLock},
    time::{SystemTime, UNIX_EPOCH},
};

use tracing_test::traced_test;

use crate::config::{self, Config, LoadOutcome, TextRetentionSetting};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("keyboard-checker-tests-{prefix}-{ts}"))
}

/// Points `APPDATA` at a fresh directory for the duration of the test.
struct AppdataOverride {
    old: Option<std::ffi::OsString>,
    dir: PathBuf,
}

impl AppdataOverride {
    fn new(prefix: &str) -> Self {
        let old = std::env::var_os("APPDATA");
        let dir = unique_temp_dir(prefix);
        fs::create_dir_all(&dir).unwrap();
        unsafe { std::env::set_var("APPDATA", &dir) };
        Self { old, dir }
    }
}

impl Drop for AppdataOverride {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe { std::env::set_var("APPDATA", v) },
            None => unsafe { std::env::remove_var("APPDATA") },
        }
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn write_config_file(contents: &str) {
    let path = config::config_path().unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn config_path_lives_under_appdata() {
    let _g = lock_env();
    let appdata = AppdataOverride::new("path");

    let path = config::config_path().unwrap();
    assert_eq!(path, appdata.dir.join("KeyboardChecker").join("config.toml"));
}

#[test]
fn config_save_and_load_roundtrip_via_appdata() {
    let _g = lock_env();
    let _appdata = AppdataOverride::new("roundtrip");

    let mut cfg = Config {
        min_text_length: 4,
        text_retention: TextRetentionSetting::Typed,
        ..Default::default()
    };
    cfg.popup.offset_y = 32;
    cfg.log.filter = "keyboard_checker_core=debug".to_string();

    config::save(&cfg).unwrap();
    let loaded = config::load().unwrap();

    assert_eq!(loaded, cfg);
}

#[test]
fn missing_config_file_loads_defaults() {
    let _g = lock_env();
    let _appdata = AppdataOverride::new("missing");

    let loaded = config::load().unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn partial_config_file_fills_in_defaults() {
    let _g = lock_env();
    let _appdata = AppdataOverride::new("partial");

    write_config_file("min_text_length = 5\ntext_retention = \"typed\"\n");

    let loaded = config::load().unwrap();
    assert_eq!(loaded.min_text_length, 5);
    assert_eq!(loaded.text_retention, TextRetentionSetting::Typed);
    assert_eq!(loaded.max_text_length, Config::default().max_text_length);
    assert_eq!(loaded.popup, Config::default().popup);
}

#[test]
fn invalid_config_file_fails_to_load() {
    let _g = lock_env();
    let _appdata = AppdataOverride::new("invalid-file");

    write_config_file("min_text_length = 10\nmax_text_length = 4\n");

    let err = config::load().unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::Other);
}

#[test]
fn config_save_rejects_invalid_lengths() {
    let _g = lock_env();
    let _appdata = AppdataOverride::new("invalid-save");

    let cfg = Config {
        min_text_length: 0,
        ..Default::default()
    };

    let err = config::save(&cfg).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert!(err.to_string().contains("min_text_length"));
    assert!(!config::config_path().unwrap().exists());
}

#[test]
fn config_path_requires_appdata() {
    let _g = lock_env();
    let appdata = AppdataOverride::new("no-appdata");
    unsafe { std::env::remove_var("APPDATA") };

    let err = config::config_path().unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);

    drop(appdata);
}

#[traced_test]
#[test]
fn first_run_writes_default_config() {
    let _g = lock_env();
    let _appdata = AppdataOverride::new("first-run");

    let outcome = config::load_or_create();
    assert!(matches!(outcome, LoadOutcome::Created(..)));
    assert!(config::config_path().unwrap().exists());

    outcome.report();
    assert!(logs_contain("wrote default config"));

    // The second start reads the file back.
    let again = config::load_or_create();
    assert!(matches!(again, LoadOutcome::Loaded(_)));
    assert_eq!(again.into_config(), Config::default());
}

#[traced_test]
#[test]
fn invalid_config_falls_back_and_warns() {
    let _g = lock_env();
    let _appdata = AppdataOverride::new("fallback");

    let bad = "min_text_length = 10\nmax_text_length = 4\n";
    write_config_file(bad);

    let outcome = config::load_or_create();
    assert!(matches!(outcome, LoadOutcome::Fallback(..)));
    assert_eq!(outcome.config(), &Config::default());

    outcome.report();
    assert!(logs_contain("failed to load config, using defaults"));

    // A broken file is left for the user to fix.
    let on_disk = fs::read_to_string(config::config_path().unwrap()).unwrap();
    assert_eq!(on_disk, bad);
}
