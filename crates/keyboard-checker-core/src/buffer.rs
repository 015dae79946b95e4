//! Held-key tracking and the derived text accumulator.
//!
//! Every content key moves through `Idle -> Captured -> Idle`: key-down
//! captures a [`KeyEvent`] into the held sequence, key-up releases the first
//! held entry equal to the event rebuilt from the *current* modifiers.
//! A key whose modifiers changed while it was held therefore stays captured
//! until a key-up arrives with the original modifiers again.
//!
//! A reset forgets the text but not the keys that are physically down. Those
//! entries stay captured so their key-ups still match, yet they no longer
//! contribute characters when the text is rebuilt.

use std::collections::VecDeque;

use crate::{
    keys::{VK_BACK, is_modifier_key},
    layout::KeyboardHost,
    modifiers::{ModifierState, ModifierTracker},
};

/// One logical key press: the key plus the modifiers active when it went down.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub vk: u32,
    pub modifiers: ModifierState,
}

/// What happens to the accumulator when a content key is released.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TextRetention {
    /// Rebuild the text from the keys that are still held.
    #[default]
    HeldKeys,
    /// Keep everything typed so far; release only frees the held entry.
    Typed,
}

#[derive(Debug)]
pub struct KeystrokeBuffer {
    tracker: ModifierTracker,
    held: Vec<KeyEvent>,
    /// `held[..stale]` was captured before the last reset.
    stale: usize,
    text: VecDeque<char>,
    retention: TextRetention,
    max_len: usize,
}

impl KeystrokeBuffer {
    pub fn new(retention: TextRetention, max_len: usize) -> Self {
        Self {
            tracker: ModifierTracker::new(),
            held: Vec::new(),
            stale: 0,
            text: VecDeque::with_capacity(max_len),
            retention,
            max_len: max_len.max(1),
        }
    }

    /// Records a key press. Returns `true` when the buffer content changed.
    pub fn on_key_down(&mut self, vk: u32, host: &impl KeyboardHost) -> bool {
        if is_modifier_key(vk) {
            self.tracker.update_from_key(vk, true);
            return false;
        }

        if vk == VK_BACK {
            self.backspace(host);
            return true;
        }

        let event = KeyEvent {
            vk,
            modifiers: self.tracker.snapshot(),
        };

        // Auto-repeat re-sends key-down for a key that is already captured.
        if !self.held.contains(&event) {
            self.held.push(event);
        }

        if let Some(ch) = resolve_char(host, event) {
            self.push_char(ch);
        }

        tracing::trace!(vk, held = self.held.len(), text_len = self.text.len(), "key captured");
        true
    }

    /// Records a key release. Returns `true` when the buffer content may have changed.
    pub fn on_key_up(&mut self, vk: u32, host: &impl KeyboardHost) -> bool {
        if is_modifier_key(vk) {
            self.tracker.update_from_key(vk, false);
            return false;
        }

        let event = KeyEvent {
            vk,
            modifiers: self.tracker.snapshot(),
        };

        match self.held.iter().position(|e| *e == event) {
            Some(i) => {
                self.held.remove(i);
                if i < self.stale {
                    self.stale -= 1;
                }
            }
            None => tracing::trace!(vk, modifiers = ?event.modifiers, "key-up without matching held entry"),
        }

        if self.retention == TextRetention::HeldKeys {
            self.rebuild_text(host);
        }
        true
    }

    /// Drops the typed text. Keys that are physically held stay captured but
    /// are not typed again when the text is rebuilt.
    pub fn reset(&mut self) {
        self.text.clear();
        self.stale = self.held.len();
    }

    pub fn held(&self) -> &[KeyEvent] {
        &self.held
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    pub fn modifiers(&self) -> ModifierState {
        self.tracker.snapshot()
    }

    /// Pops the last char together with the held key that typed it. Keys that
    /// produce no char (function keys, shortcuts) are left alone.
    fn backspace(&mut self, host: &impl KeyboardHost) {
        if self.text.pop_back().is_none() {
            return;
        }

        let typed_by = self.held[self.stale..]
            .iter()
            .rposition(|&e| resolve_char(host, e).is_some());
        if let Some(i) = typed_by {
            self.held.remove(self.stale + i);
        }
    }

    fn push_char(&mut self, ch: char) {
        self.text.push_back(ch);
        while self.text.len() > self.max_len {
            let _ = self.text.pop_front();
        }
    }

    fn rebuild_text(&mut self, host: &impl KeyboardHost) {
        let chars: Vec<char> = self.held[self.stale..]
            .iter()
            .filter_map(|&e| resolve_char(host, e))
            .collect();

        self.text.clear();
        for ch in chars {
            self.push_char(ch);
        }
    }
}

/// Character the active layout produces for `event`, if it is typing at all.
fn resolve_char(host: &impl KeyboardHost, event: KeyEvent) -> Option<char> {
    if event.modifiers.is_shortcut() {
        return None;
    }
    let layout = host.active_layout()?;
    host.char_for_key(event.vk, event.modifiers.shift_state(), layout)
        .filter(|ch| !ch.is_control())
}
