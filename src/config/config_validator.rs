use std::fmt::Write as _;

use crate::config::Config;

pub fn find_config_problems(config: &Config) -> Vec<String> {
    let mut problems = Vec::new();

    if config.min_text_length == 0 {
        problems.push("'min_text_length' must be at least 1".to_string());
    }
    if config.max_text_length < config.min_text_length {
        problems.push(format!(
            "'max_text_length' ({}) must not be smaller than 'min_text_length' ({})",
            config.max_text_length, config.min_text_length
        ));
    }
    if config.popup.width <= 0 || config.popup.height <= 0 {
        problems.push("popup 'width' and 'height' must be positive".to_string());
    }
    if config.log.directory.trim().is_empty() {
        problems.push("log 'directory' must not be empty".to_string());
    }

    problems
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        let problems = find_config_problems(self);
        if problems.is_empty() {
            return Ok(());
        }

        let mut error = String::from("Invalid configuration:\n\n");
        for p in &problems {
            // `String` implements `fmt::Write` infallibly; ignore the `fmt::Result` for clarity.
            let _ = writeln!(error, "- {p}");
        }
        Err(error)
    }
}
