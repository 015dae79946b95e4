use serde::Deserialize;

use super::{Config, LogConfig, PopupConfig, TextRetentionSetting};

/// Config as read from disk, before validation. Missing keys take defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub min_text_length: usize,
    pub max_text_length: usize,
    pub text_retention: TextRetentionSetting,
    pub popup: PopupConfig,
    pub log: LogConfig,
}

impl Default for RawConfig {
    fn default() -> Self {
        let cfg = Config::default();
        Self {
            min_text_length: cfg.min_text_length,
            max_text_length: cfg.max_text_length,
            text_retention: cfg.text_retention,
            popup: cfg.popup,
            log: cfg.log,
        }
    }
}
