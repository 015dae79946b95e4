pub(crate) mod config_validator;
pub mod raw_config;

use std::{
    io,
    path::{Path, PathBuf},
};

use keyboard_checker_core::{CheckerSettings, TextRetention};
pub use raw_config::RawConfig;
use serde::{Deserialize, Deserializer, Serialize};

const APP_DIR: &str = "KeyboardChecker";
const CONFIG_FILE: &str = "config.toml";

/// What the buffer keeps once a key is released.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TextRetentionSetting {
    #[default]
    HeldKeys,
    Typed,
}

impl From<TextRetentionSetting> for TextRetention {
    fn from(value: TextRetentionSetting) -> Self {
        match value {
            TextRetentionSetting::HeldKeys => TextRetention::HeldKeys,
            TextRetentionSetting::Typed => TextRetention::Typed,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PopupConfig {
    /// Vertical distance between the cursor and the popup's top edge.
    pub offset_y: i32,
    pub width: i32,
    pub height: i32,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            offset_y: 20,
            width: 300,
            height: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub directory: String,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Config {
    pub min_text_length: usize,
    pub max_text_length: usize,
    pub text_retention: TextRetentionSetting,
    pub popup: PopupConfig,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        let core = CheckerSettings::default();
        Self {
            min_text_length: core.min_text_length,
            max_text_length: core.max_text_length,
            text_retention: TextRetentionSetting::default(),
            popup: PopupConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    pub fn checker_settings(&self) -> CheckerSettings {
        CheckerSettings {
            min_text_length: self.min_text_length,
            max_text_length: self.max_text_length,
            text_retention: self.text_retention.into(),
        }
    }
}

pub fn config_path() -> io::Result<PathBuf> {
    let appdata = std::env::var_os("APPDATA")
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "APPDATA is not set"))?;

    Ok(PathBuf::from(appdata).join(APP_DIR).join(CONFIG_FILE))
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    std::fs::create_dir_all(dir)
}

fn confy_err(e: confy::ConfyError) -> io::Error {
    io::Error::other(e)
}

pub fn load() -> io::Result<Config> {
    let path = config_path()?;
    ensure_parent_dir(&path)?;

    confy::load_path(&path).map_err(confy_err)
}

pub fn save(cfg: &Config) -> io::Result<()> {
    cfg.validate()
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let path = config_path()?;
    ensure_parent_dir(&path)?;
    confy::store_path(path, cfg).map_err(confy_err)
}

/// Result of reading the config at startup.
///
/// Tracing is configured from the config itself, so what happened while
/// reading it is logged afterwards through [`LoadOutcome::report`].
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Config),
    /// No file existed; the defaults were written out.
    Created(Config, PathBuf),
    /// The file could not be used; running on defaults.
    Fallback(Config, io::Error),
}

impl LoadOutcome {
    pub fn config(&self) -> &Config {
        match self {
            Self::Loaded(cfg) | Self::Created(cfg, _) | Self::Fallback(cfg, _) => cfg,
        }
    }

    pub fn into_config(self) -> Config {
        match self {
            Self::Loaded(cfg) | Self::Created(cfg, _) | Self::Fallback(cfg, _) => cfg,
        }
    }

    pub fn report(&self) {
        match self {
            Self::Loaded(_) => tracing::debug!("config loaded"),
            Self::Created(_, path) => {
                tracing::info!(path = %path.display(), "wrote default config");
            }
            Self::Fallback(_, e) => {
                tracing::warn!(error = %e, "failed to load config, using defaults");
            }
        }
    }
}

/// Loads the config, writing the defaults on first run.
///
/// Never fails: an unreadable or invalid file leaves it untouched and falls
/// back to defaults.
pub fn load_or_create() -> LoadOutcome {
    let path = match config_path() {
        Ok(path) => path,
        Err(e) => return LoadOutcome::Fallback(Config::default(), e),
    };

    if !path.exists() {
        let cfg = Config::default();
        return match save(&cfg) {
            Ok(()) => LoadOutcome::Created(cfg, path),
            Err(e) => LoadOutcome::Fallback(cfg, e),
        };
    }

    match load() {
        Ok(cfg) => LoadOutcome::Loaded(cfg),
        Err(e) => LoadOutcome::Fallback(Config::default(), e),
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = String;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let cfg = Self {
            min_text_length: raw.min_text_length,
            max_text_length: raw.max_text_length,
            text_retention: raw.text_retention,
            popup: raw.popup,
            log: raw.log,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawConfig::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}
