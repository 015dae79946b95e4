use windows::{
    Win32::{
        Foundation::{HINSTANCE, HWND},
        Graphics::Gdi::{COLOR_INFOBK, GetSysColorBrush},
        UI::WindowsAndMessaging::{
            CS_HREDRAW, CS_VREDRAW, CreateWindowExW, DispatchMessageW, GetMessageW, MSG,
            RegisterClassExW, TranslateMessage, WINDOW_EX_STYLE, WNDCLASSEXW, WNDPROC, WS_BORDER,
            WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_OVERLAPPEDWINDOW, WS_POPUP,
        },
    },
    core::{PCWSTR, Result, w},
};

use crate::utils::helpers;

pub(crate) const MAIN_CLASS: PCWSTR = w!("KeyboardCheckerMainWindow");
pub(crate) const POPUP_CLASS: PCWSTR = w!("KeyboardCheckerPopup");

pub(crate) fn register_class(
    class_name: PCWSTR,
    hinstance: HINSTANCE,
    wndproc: WNDPROC,
) -> Result<()> {
    let wc = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: wndproc,
        lpszClassName: class_name,
        hInstance: hinstance,
        hbrBackground: unsafe { GetSysColorBrush(COLOR_INFOBK) },
        ..Default::default()
    };

    unsafe {
        if RegisterClassExW(&raw const wc) == 0 {
            return Err(helpers::last_error());
        }
    }
    Ok(())
}

/// Never shown; owns the tray icon and receives the app messages.
pub(crate) fn create_main_window(hinstance: HINSTANCE) -> Result<HWND> {
    unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            MAIN_CLASS,
            w!("KeyboardChecker"),
            WS_OVERLAPPEDWINDOW,
            0,
            0,
            0,
            0,
            None,
            None,
            Some(hinstance),
            None,
        )
    }
}

/// Topmost borderless popup that never takes focus from the typing app.
pub(crate) fn create_popup_window(hinstance: HINSTANCE, width: i32, height: i32) -> Result<HWND> {
    unsafe {
        CreateWindowExW(
            WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_NOACTIVATE,
            POPUP_CLASS,
            w!("Layout suggestions"),
            WS_POPUP | WS_BORDER,
            0,
            0,
            width,
            height,
            None,
            None,
            Some(hinstance),
            None,
        )
    }
}

pub(crate) fn message_loop() -> Result<()> {
    unsafe {
        let mut msg = MSG::default();
        loop {
            let r = GetMessageW(&raw mut msg, None, 0, 0);
            if r.0 == -1 {
                return Err(helpers::last_error());
            }
            if r.0 == 0 {
                break;
            }
            let _ = TranslateMessage(&raw const msg);
            DispatchMessageW(&raw const msg);
        }
    }
    Ok(())
}
