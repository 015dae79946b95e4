#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(windows)]
fn main() -> windows::core::Result<()> {
    use keyboard_checker::{config, platform::win, utils};

    let loaded = config::load_or_create();
    utils::tracing::init_tracing(&loaded.config().log);
    loaded.report();
    let cfg = loaded.into_config();

    let Some(_guard) = utils::helpers::single_instance_guard()? else {
        tracing::info!("another instance is already running");
        return Ok(());
    };

    let result = win::run(&cfg);
    if let Err(e) = &result {
        tracing::error!(error = %e, "keyboard checker stopped");
    }
    result
}

#[cfg(not(windows))]
fn main() {
    eprintln!("keyboard-checker only runs on Windows");
}
