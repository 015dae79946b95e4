//! Windows adapter: hook, hidden main window, popup and tray.

pub mod host;
pub(crate) mod keyboard;
pub(crate) mod popup;
pub(crate) mod tray;
mod window;

use keyboard_checker_core::{LayoutRegistry, PassOutcome, drain};
use windows::{
    Win32::{
        Foundation::{HWND, LPARAM, LRESULT, WPARAM},
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{DefWindowProcW, PostQuitMessage, WM_APP, WM_DESTROY},
    },
    core::{Error, HRESULT, PCWSTR, Result},
};

use self::{
    host::WinKeyboard,
    popup::{PopupNotifier, popup_wndproc},
    tray::WM_APP_TRAY,
    window::{
        MAIN_CLASS, POPUP_CLASS, create_main_window, create_popup_window, message_loop,
        register_class,
    },
};
use crate::{
    app::{self, AppContext},
    config::Config,
};

/// Posted by the hook when the recompute slot goes from empty to pending.
pub const WM_APP_RECOMPUTE: u32 = WM_APP + 2;

fn on_recompute() {
    let Some(ctx) = app::context() else {
        return;
    };

    let mut notifier = PopupNotifier::new(ctx);
    match drain(&ctx.slot, &ctx.registry, &ctx.host, &mut notifier) {
        Some(PassOutcome::Suggested(found)) => {
            tracing::trace!(found = found.len(), "pass finished");
        }
        Some(outcome) => tracing::trace!(?outcome, "pass finished"),
        None => {}
    }
}

pub extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_APP_RECOMPUTE => {
            on_recompute();
            LRESULT(0)
        }
        WM_APP_TRAY => {
            if let Err(e) = tray::on_tray_message(hwnd, lparam.0) {
                tracing::warn!(error = %e, "tray message failed");
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            keyboard::uninstall();
            tray::remove_icon(hwnd);
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

fn checker_error(e: keyboard_checker_core::CheckerError) -> Error {
    Error::new(HRESULT(0x8000_4005_u32.cast_signed()), e.to_string())
}

/// Enumerates layouts, wires up windows, tray and hook, then pumps messages until exit.
pub fn run(config: &Config) -> Result<()> {
    let registry = LayoutRegistry::enumerate(&WinKeyboard).map_err(checker_error)?;
    tracing::info!(layouts = registry.len(), "keyboard layouts enumerated");

    let ctx = app::install(AppContext::new(config, registry)).map_err(checker_error)?;

    let hinstance = unsafe { GetModuleHandleW(PCWSTR::null()) }?.into();
    register_class(MAIN_CLASS, hinstance, Some(wndproc))?;
    register_class(POPUP_CLASS, hinstance, Some(popup_wndproc))?;

    let main = create_main_window(hinstance)?;
    let popup = create_popup_window(hinstance, config.popup.width, config.popup.height)?;
    ctx.set_windows(main, popup);

    tray::add_icon(main)?;
    keyboard::install()?;

    tracing::info!("keyboard checker running");
    message_loop()
}
