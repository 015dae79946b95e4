//! `KeyboardHost` backed by the Win32 keyboard layout APIs.

use std::ptr::null_mut;

use keyboard_checker_core::{
    CheckerError, KeyboardHost, LayoutDescriptor, LayoutId, ShiftState, layout::primary_language,
};
use windows::Win32::{
    Globalization::{GetLocaleInfoW, LOCALE_SLOCALIZEDDISPLAYNAME},
    UI::{
        Input::KeyboardAndMouse::{
            GetKeyboardLayout, GetKeyboardLayoutList, HKL, MAPVK_VK_TO_VSC, MapVirtualKeyExW,
            ToUnicodeEx, VK_SHIFT,
        },
        WindowsAndMessaging::{GetForegroundWindow, GetWindowThreadProcessId},
    },
};

use crate::utils::helpers;

/// `ToUnicodeEx` flag: leave the kernel keyboard state (dead keys) untouched.
const TU_NO_STATE_CHANGE: u32 = 0x4;
const KEY_DOWN: u8 = 0x80;

#[derive(Debug, Default, Clone, Copy)]
pub struct WinKeyboard;

fn hkl(id: LayoutId) -> HKL {
    HKL(id.0 as *mut _)
}

fn langid(id: LayoutId) -> u16 {
    (id.0 & 0xFFFF) as u16
}

fn locale_display_name(langid: u16) -> Option<String> {
    let mut buf = [0u16; 128];
    let len = unsafe {
        GetLocaleInfoW(
            u32::from(langid),
            LOCALE_SLOCALIZEDDISPLAYNAME,
            Some(&mut buf),
        )
    };
    // `len` counts the terminator.
    let len = usize::try_from(len).ok()?.checked_sub(1)?;
    if len == 0 {
        return None;
    }
    Some(String::from_utf16_lossy(&buf[..len]))
}

impl KeyboardHost for WinKeyboard {
    fn installed_layouts(&self) -> Result<Vec<LayoutId>, CheckerError> {
        let enumeration_failed =
            || CheckerError::LayoutEnumeration(helpers::last_error().message().to_string());

        let n = unsafe { GetKeyboardLayoutList(None) };
        let count = usize::try_from(n).map_err(|_| enumeration_failed())?;
        if count == 0 {
            return Err(enumeration_failed());
        }

        let mut layouts = vec![HKL(null_mut()); count];
        let filled = unsafe { GetKeyboardLayoutList(Some(layouts.as_mut_slice())) };
        let filled = usize::try_from(filled).map_err(|_| enumeration_failed())?;
        layouts.truncate(filled);

        Ok(layouts.into_iter().map(|h| LayoutId(h.0 as usize)).collect())
    }

    fn describe(&self, id: LayoutId) -> Option<LayoutDescriptor> {
        let lang = langid(id);
        if lang == 0 {
            return None;
        }

        let display_name = locale_display_name(lang).unwrap_or_else(|| id.to_string());
        Some(LayoutDescriptor {
            id,
            display_name,
            primary_language: primary_language(lang),
        })
    }

    fn active_layout(&self) -> Option<LayoutId> {
        let fg = unsafe { GetForegroundWindow() };
        if fg.0.is_null() {
            return None;
        }

        let tid = unsafe { GetWindowThreadProcessId(fg, None) };
        let layout = unsafe { GetKeyboardLayout(tid) };
        (!layout.0.is_null()).then_some(LayoutId(layout.0 as usize))
    }

    fn char_for_key(&self, vk: u32, shift: ShiftState, layout: LayoutId) -> Option<char> {
        let layout = hkl(layout);

        let mut state = [0u8; 256];
        if shift == ShiftState::Shifted {
            state[usize::from(VK_SHIFT.0)] = KEY_DOWN;
        }

        let scan = unsafe { MapVirtualKeyExW(vk, MAPVK_VK_TO_VSC, Some(layout)) };

        let mut buf = [0u16; 8];
        let rc = unsafe {
            ToUnicodeEx(vk, scan, &state, &mut buf, TU_NO_STATE_CHANGE, Some(layout))
        };

        // Dead keys report -1, ligatures more than one unit; neither maps to a single char.
        if rc != 1 {
            return None;
        }

        char::decode_utf16([buf[0]])
            .next()?
            .ok()
            .filter(|ch| !ch.is_control())
    }
}
