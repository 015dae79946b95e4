//! Low level keyboard hook. Observes keystrokes, never swallows them.

use std::sync::atomic::{AtomicIsize, Ordering};

use windows::{
    Win32::{
        Foundation::{LPARAM, LRESULT, WPARAM},
        UI::{
            Input::KeyboardAndMouse::{
                MAPVK_VSC_TO_VK_EX, MapVirtualKeyW, VK_CONTROL, VK_LCONTROL, VK_LMENU, VK_MENU,
                VK_RCONTROL, VK_RMENU, VK_SHIFT,
            },
            WindowsAndMessaging::{
                CallNextHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, LLKHF_EXTENDED, LLKHF_INJECTED,
                SetWindowsHookExW, UnhookWindowsHookEx, WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP,
                WM_SYSKEYDOWN, WM_SYSKEYUP,
            },
        },
    },
    core::Result,
};

use crate::app;

static HOOK_HANDLE: AtomicIsize = AtomicIsize::new(0);

fn current_hook() -> Option<HHOOK> {
    let h = HOOK_HANDLE.load(Ordering::Relaxed);
    (h != 0).then_some(HHOOK(h as *mut _))
}

/// Resolves the generic shift, control and alt codes to their left/right variants.
fn normalize_vk(kb: &KBDLLHOOKSTRUCT) -> u32 {
    let vk = kb.vkCode;
    let extended = kb.flags.contains(LLKHF_EXTENDED);

    match vk {
        x if x == u32::from(VK_SHIFT.0) => {
            let mapped = unsafe { MapVirtualKeyW(kb.scanCode, MAPVK_VSC_TO_VK_EX) };
            if mapped != 0 { mapped } else { vk }
        }
        x if x == u32::from(VK_CONTROL.0) => {
            if extended {
                u32::from(VK_RCONTROL.0)
            } else {
                u32::from(VK_LCONTROL.0)
            }
        }
        x if x == u32::from(VK_MENU.0) => {
            if extended {
                u32::from(VK_RMENU.0)
            } else {
                u32::from(VK_LMENU.0)
            }
        }
        _ => vk,
    }
}

fn key_transition(msg: u32) -> Option<bool> {
    match msg {
        WM_KEYDOWN | WM_SYSKEYDOWN => Some(true),
        WM_KEYUP | WM_SYSKEYUP => Some(false),
        _ => None,
    }
}

extern "system" fn proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let hook = current_hook();

    if code == HC_ACTION.cast_signed()
        && let Ok(msg) = u32::try_from(wparam.0)
        && let Some(pressed) = key_transition(msg)
        && let Some(ctx) = app::context()
    {
        let kb = unsafe { &*(lparam.0 as *const KBDLLHOOKSTRUCT) };

        // Our own or other tools' synthesized input is not typing.
        if !kb.flags.contains(LLKHF_INJECTED) {
            ctx.handle_key(normalize_vk(kb), pressed);
        }
    }

    unsafe { CallNextHookEx(hook, code, wparam, lparam) }
}

pub fn install() -> Result<()> {
    if HOOK_HANDLE.load(Ordering::Relaxed) != 0 {
        return Ok(());
    }

    let h = unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(proc), None, 0) }?;
    HOOK_HANDLE.store(h.0 as isize, Ordering::Relaxed);
    tracing::info!("WH_KEYBOARD_LL installed");
    Ok(())
}

pub fn uninstall() {
    let h = HOOK_HANDLE.swap(0, Ordering::Relaxed);
    if h == 0 {
        return;
    }

    if let Err(e) = unsafe { UnhookWindowsHookEx(HHOOK(h as *mut _)) } {
        tracing::warn!(error = %e, "failed to remove keyboard hook");
    } else {
        tracing::info!("WH_KEYBOARD_LL removed");
    }
}
