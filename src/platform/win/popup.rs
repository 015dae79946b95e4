//! Suggestion popup shown next to the mouse cursor.

use keyboard_checker_core::{SuggestionNotifier, Suggestions, format_suggestions};
use windows::Win32::{
    Foundation::{HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
    Graphics::Gdi::{
        BeginPaint, DT_LEFT, DT_NOPREFIX, DT_WORDBREAK, DrawTextW, EndPaint, InvalidateRect,
        PAINTSTRUCT, SetBkMode, TRANSPARENT,
    },
    UI::WindowsAndMessaging::{
        DefWindowProcW, GetClientRect, GetCursorPos, HWND_TOPMOST, MA_NOACTIVATE,
        SWP_NOACTIVATE, SWP_SHOWWINDOW, SW_HIDE, SetWindowPos, ShowWindow, WM_MOUSEACTIVATE,
        WM_PAINT,
    },
};

use crate::{app::AppContext, utils::helpers};

const TEXT_MARGIN: i32 = 6;

/// Routes pass results to the popup window owned by `ctx`.
pub struct PopupNotifier<'a> {
    ctx: &'a AppContext,
}

impl<'a> PopupNotifier<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    fn hide(&self, hwnd: HWND) {
        let _ = unsafe { ShowWindow(hwnd, SW_HIDE) };
    }

    fn show_near_cursor(&self, hwnd: HWND) {
        let mut pt = POINT::default();
        if let Err(e) = unsafe { GetCursorPos(&raw mut pt) } {
            tracing::debug!(error = %e, "cursor position unavailable");
        }

        let popup = self.ctx.popup;
        let placed = unsafe {
            SetWindowPos(
                hwnd,
                Some(HWND_TOPMOST),
                pt.x,
                pt.y + popup.offset_y,
                popup.width,
                popup.height,
                SWP_NOACTIVATE | SWP_SHOWWINDOW,
            )
        };
        if let Err(e) = placed {
            tracing::warn!(error = %e, "failed to position popup");
        }

        let _ = unsafe { InvalidateRect(Some(hwnd), None, true) };
    }
}

impl SuggestionNotifier for PopupNotifier<'_> {
    fn present(&mut self, current_text: &str, suggestions: &Suggestions) {
        let Some(hwnd) = self.ctx.popup_hwnd() else {
            return;
        };

        if suggestions.is_empty() {
            self.hide(hwnd);
            return;
        }

        let body = format_suggestions(current_text, suggestions, &self.ctx.registry);

        if let Ok(mut text) = self.ctx.popup_text.lock() {
            *text = body;
        }
        self.show_near_cursor(hwnd);
    }
}

fn paint(hwnd: HWND) {
    let Some(ctx) = crate::app::context() else {
        return;
    };

    let mut wide = match ctx.popup_text.lock() {
        Ok(text) => helpers::to_wide(&text),
        Err(_) => return,
    };

    unsafe {
        let mut ps = PAINTSTRUCT::default();
        let hdc = BeginPaint(hwnd, &raw mut ps);

        let mut rect = RECT::default();
        if GetClientRect(hwnd, &raw mut rect).is_ok() {
            rect.left += TEXT_MARGIN;
            rect.top += TEXT_MARGIN;
            rect.right -= TEXT_MARGIN;
            rect.bottom -= TEXT_MARGIN;

            SetBkMode(hdc, TRANSPARENT);
            DrawTextW(
                hdc,
                &mut wide,
                &raw mut rect,
                DT_LEFT | DT_WORDBREAK | DT_NOPREFIX,
            );
        }

        let _ = EndPaint(hwnd, &raw const ps);
    }
}

pub(crate) extern "system" fn popup_wndproc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_PAINT => {
            paint(hwnd);
            LRESULT(0)
        }
        // Clicking the popup must not steal focus from the typing app.
        WM_MOUSEACTIVATE => LRESULT(MA_NOACTIVATE as isize),
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
