use windows::{
    Win32::{
        Foundation::{HWND, POINT},
        UI::{
            Shell::{
                NIF_ICON, NIF_MESSAGE, NIF_SHOWTIP, NIF_TIP, NIM_ADD, NIM_DELETE, NIM_SETVERSION,
                NOTIFY_ICON_MESSAGE, NOTIFYICON_VERSION_4, NOTIFYICONDATAW, Shell_NotifyIconW,
            },
            WindowsAndMessaging::{
                AppendMenuW, CreatePopupMenu, DestroyMenu, DestroyWindow, GetCursorPos, HMENU,
                IDI_APPLICATION, LoadIconW, MF_STRING, SetForegroundWindow, TPM_BOTTOMALIGN,
                TPM_NOANIMATION, TPM_RETURNCMD, TPM_RIGHTALIGN, TPM_RIGHTBUTTON, TrackPopupMenu,
                WM_APP, WM_CONTEXTMENU, WM_RBUTTONUP,
            },
        },
    },
    core::{Error, HRESULT, Result, w},
};

use crate::utils::helpers::fill_wide;

pub const WM_APP_TRAY: u32 = WM_APP + 3;
const TRAY_UID: u32 = 1;
const ID_EXIT: u32 = 1001;

fn shell_notify(action: NOTIFY_ICON_MESSAGE, nid: &NOTIFYICONDATAW, what: &str) -> Result<()> {
    if unsafe { Shell_NotifyIconW(action, nid) }.as_bool() {
        Ok(())
    } else {
        Err(Error::new(
            HRESULT(0x8000_4005_u32.cast_signed()),
            format!("Shell_NotifyIconW returned FALSE: {what}"),
        ))
    }
}

fn base_nid(hwnd: HWND) -> Result<NOTIFYICONDATAW> {
    Ok(NOTIFYICONDATAW {
        cbSize: u32::try_from(core::mem::size_of::<NOTIFYICONDATAW>())?,
        hWnd: hwnd,
        uID: TRAY_UID,
        ..Default::default()
    })
}

pub fn add_icon(hwnd: HWND) -> Result<()> {
    let mut nid = base_nid(hwnd)?;
    nid.uCallbackMessage = WM_APP_TRAY;
    nid.uFlags = NIF_MESSAGE | NIF_ICON | NIF_TIP | NIF_SHOWTIP;
    nid.hIcon = unsafe { LoadIconW(None, IDI_APPLICATION) }?;
    fill_wide(&mut nid.szTip, "Keyboard Checker");

    shell_notify(NIM_ADD, &nid, "add_icon")?;

    nid.Anonymous.uVersion = NOTIFYICON_VERSION_4;
    shell_notify(NIM_SETVERSION, &nid, "add_icon NIM_SETVERSION")
}

pub fn remove_icon(hwnd: HWND) {
    let Ok(nid) = base_nid(hwnd) else {
        return;
    };
    if let Err(e) = shell_notify(NIM_DELETE, &nid, "remove_icon") {
        tracing::debug!(error = %e, "tray icon already gone");
    }
}

fn show_menu_at_cursor(hwnd: HWND, hmenu: HMENU) -> u32 {
    let mut pt = POINT::default();
    let _ = unsafe { GetCursorPos(&raw mut pt) };

    // Without this the menu does not close when clicking elsewhere.
    let _ = unsafe { SetForegroundWindow(hwnd) };

    let result = unsafe {
        TrackPopupMenu(
            hmenu,
            TPM_RETURNCMD | TPM_BOTTOMALIGN | TPM_RIGHTALIGN | TPM_NOANIMATION | TPM_RIGHTBUTTON,
            pt.x,
            pt.y,
            Some(0),
            hwnd,
            None,
        )
    };
    result.0 as u32
}

fn show_context_menu(hwnd: HWND) -> Result<()> {
    let hmenu = unsafe { CreatePopupMenu() }?;

    let picked = unsafe { AppendMenuW(hmenu, MF_STRING, ID_EXIT as usize, w!("Exit")) }
        .map(|()| show_menu_at_cursor(hwnd, hmenu));
    let _ = unsafe { DestroyMenu(hmenu) };

    if picked? == ID_EXIT {
        tracing::info!("exit requested from tray");
        remove_icon(hwnd);
        unsafe { DestroyWindow(hwnd) }?;
    }
    Ok(())
}

/// Handles `WM_APP_TRAY`. With `NOTIFYICON_VERSION_4` the event is the low word of `lparam`.
pub fn on_tray_message(hwnd: HWND, lparam: isize) -> Result<()> {
    let event = (lparam as usize & 0xFFFF) as u32;
    match event {
        WM_RBUTTONUP | WM_CONTEXTMENU => show_context_menu(hwnd),
        _ => Ok(()),
    }
}
