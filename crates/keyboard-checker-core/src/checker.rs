use crate::{
    buffer::{KeystrokeBuffer, TextRetention},
    keys::is_reset_key,
    layout::KeyboardHost,
    schedule::PassRequest,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckerSettings {
    /// Shortest text worth converting.
    pub min_text_length: usize,
    /// Longest text kept; older characters are dropped first.
    pub max_text_length: usize,
    pub text_retention: TextRetention,
}

impl Default for CheckerSettings {
    fn default() -> Self {
        Self {
            min_text_length: 3,
            max_text_length: 64,
            text_retention: TextRetention::HeldKeys,
        }
    }
}

/// Per-process checker state touched by the interception callback.
///
/// Every handler only mutates the buffer and says what the deferred pass
/// should do; no conversion work happens here.
#[derive(Debug)]
pub struct KeyboardChecker {
    settings: CheckerSettings,
    buffer: KeystrokeBuffer,
}

impl KeyboardChecker {
    pub fn new(settings: CheckerSettings) -> Self {
        let buffer = KeystrokeBuffer::new(settings.text_retention, settings.max_text_length);
        Self { settings, buffer }
    }

    /// Returns `None` when nothing needs recomputing (modifier keys).
    ///
    /// A reset key clears the text for good: keys still held at that point
    /// are not typed again when they are released.
    pub fn on_key_down(&mut self, vk: u32, host: &impl KeyboardHost) -> Option<PassRequest> {
        if !self.buffer.on_key_down(vk, host) {
            return None;
        }
        if is_reset_key(vk) {
            self.buffer.reset();
        }
        Some(self.pending_request())
    }

    pub fn on_key_up(&mut self, vk: u32, host: &impl KeyboardHost) -> Option<PassRequest> {
        self.buffer
            .on_key_up(vk, host)
            .then(|| self.pending_request())
    }

    /// Forgets the typed text, e.g. after focus moved to another window.
    pub fn reset(&mut self) -> PassRequest {
        self.buffer.reset();
        PassRequest::Withdraw
    }

    pub fn buffer(&self) -> &KeystrokeBuffer {
        &self.buffer
    }

    pub fn settings(&self) -> &CheckerSettings {
        &self.settings
    }

    fn pending_request(&self) -> PassRequest {
        if self.buffer.text_len() >= self.settings.min_text_length {
            PassRequest::Convert {
                text: self.buffer.text(),
            }
        } else {
            PassRequest::Withdraw
        }
    }
}
