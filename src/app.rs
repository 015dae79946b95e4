use std::sync::{
    Mutex,
    atomic::{AtomicIsize, Ordering},
};

use keyboard_checker_core::{
    CheckerError, KeyboardChecker, LayoutRegistry, PassRequest, RecomputeSlot, Registration,
};
use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::WindowsAndMessaging::{GetForegroundWindow, PostMessageW},
};

use crate::{
    config::{Config, PopupConfig},
    platform::win::{WM_APP_RECOMPUTE, host::WinKeyboard},
};

static CONTEXT: Registration<AppContext> = Registration::new();

/// Process-wide state shared by the keyboard hook and the window procedures.
pub struct AppContext {
    pub checker: Mutex<KeyboardChecker>,
    pub slot: RecomputeSlot,
    pub registry: LayoutRegistry,
    pub host: WinKeyboard,
    pub popup: PopupConfig,
    pub popup_text: Mutex<String>,
    main_hwnd: AtomicIsize,
    popup_hwnd: AtomicIsize,
    last_foreground: AtomicIsize,
}

fn load_hwnd(cell: &AtomicIsize) -> Option<HWND> {
    let raw = cell.load(Ordering::Acquire);
    (raw != 0).then_some(HWND(raw as *mut _))
}

impl AppContext {
    pub fn new(config: &Config, registry: LayoutRegistry) -> Self {
        Self {
            checker: Mutex::new(KeyboardChecker::new(config.checker_settings())),
            slot: RecomputeSlot::new(),
            registry,
            host: WinKeyboard,
            popup: config.popup,
            popup_text: Mutex::new(String::new()),
            main_hwnd: AtomicIsize::new(0),
            popup_hwnd: AtomicIsize::new(0),
            last_foreground: AtomicIsize::new(0),
        }
    }

    pub fn set_windows(&self, main: HWND, popup: HWND) {
        self.main_hwnd.store(main.0 as isize, Ordering::Release);
        self.popup_hwnd.store(popup.0 as isize, Ordering::Release);
    }

    pub fn main_hwnd(&self) -> Option<HWND> {
        load_hwnd(&self.main_hwnd)
    }

    pub fn popup_hwnd(&self) -> Option<HWND> {
        load_hwnd(&self.popup_hwnd)
    }

    /// Feeds one key transition to the checker and schedules the follow-up pass.
    ///
    /// Runs inside the hook callback, so it never converts anything itself.
    pub fn handle_key(&self, vk: u32, pressed: bool) {
        let mut requests = Vec::with_capacity(2);

        {
            let Ok(mut checker) = self.checker.lock() else {
                tracing::warn!("checker lock poisoned, dropping key");
                return;
            };

            if self.foreground_changed() {
                tracing::debug!("foreground window changed, buffer reset");
                requests.push(checker.reset());
            }

            let request = if pressed {
                checker.on_key_down(vk, &self.host)
            } else {
                checker.on_key_up(vk, &self.host)
            };
            requests.extend(request);
        }

        for request in requests {
            self.schedule(request);
        }
    }

    fn foreground_changed(&self) -> bool {
        let fg = unsafe { GetForegroundWindow() }.0 as isize;
        let prev = self.last_foreground.swap(fg, Ordering::AcqRel);
        prev != 0 && prev != fg
    }

    /// Hands `request` to the slot; only the first pending request posts a wake-up.
    pub fn schedule(&self, request: PassRequest) {
        if !self.slot.offer(request) {
            return;
        }

        let Some(hwnd) = self.main_hwnd() else {
            return;
        };

        if let Err(e) = unsafe { PostMessageW(Some(hwnd), WM_APP_RECOMPUTE, WPARAM(0), LPARAM(0)) } {
            tracing::warn!(error = %e, "failed to post recompute message");
        }
    }
}

/// Makes `ctx` reachable from the context-free hook callback. Allowed once.
pub fn install(ctx: AppContext) -> Result<&'static AppContext, CheckerError> {
    if CONTEXT.is_registered() {
        return Err(CheckerError::AlreadyRegistered);
    }

    let ctx: &'static AppContext = Box::leak(Box::new(ctx));
    CONTEXT.register(ctx)?;
    Ok(ctx)
}

pub fn context() -> Option<&'static AppContext> {
    CONTEXT.get()
}
