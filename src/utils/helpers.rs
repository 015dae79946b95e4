//! Small wrappers around recurring Windows API patterns.

use windows::{
    Win32::{
        Foundation::{CloseHandle, ERROR_ALREADY_EXISTS, GetLastError, HANDLE},
        System::Threading::CreateMutexW,
    },
    core::{Error, HRESULT, Result, w},
};

/// Last OS error as a `windows::core::Error`.
pub fn last_error() -> Error {
    Error::from_hresult(HRESULT::from_win32(unsafe { GetLastError() }.0))
}

/// Holds the named mutex that marks the running instance.
pub struct SingleInstanceGuard(HANDLE);

impl Drop for SingleInstanceGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Returns `None` when another instance already owns the mutex.
pub fn single_instance_guard() -> Result<Option<SingleInstanceGuard>> {
    unsafe {
        let h = CreateMutexW(None, false, w!("Local\\KeyboardChecker_SingleInstance"))?;

        if GetLastError() == ERROR_ALREADY_EXISTS {
            let _ = CloseHandle(h);
            return Ok(None);
        }

        Ok(Some(SingleInstanceGuard(h)))
    }
}

/// UTF-16 copy of `s` without a terminator, for APIs taking a length.
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

/// Copies `s` into a fixed buffer, truncating and always terminating.
pub fn fill_wide(dst: &mut [u16], s: &str) {
    if let Some((last, body)) = dst.split_last_mut() {
        for (d, ch) in body
            .iter_mut()
            .zip(s.encode_utf16().chain(std::iter::repeat(0)))
        {
            *d = ch;
        }
        *last = 0;
    }
}
