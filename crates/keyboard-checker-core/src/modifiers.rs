use crate::{
    keys::{
        VK_CONTROL, VK_LCONTROL, VK_LMENU, VK_LSHIFT, VK_LWIN, VK_MENU, VK_RCONTROL, VK_RMENU,
        VK_RSHIFT, VK_RWIN, VK_SHIFT, is_modifier_key,
    },
    layout::ShiftState,
};

/// Pressed state of the four modifier groups at one instant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModifierState {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub win: bool,
}

impl ModifierState {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        win: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub fn shift_state(self) -> ShiftState {
        if self.shift {
            ShiftState::Shifted
        } else {
            ShiftState::Unshifted
        }
    }

    /// Ctrl, Alt or Win held: the key is part of a shortcut, not typing.
    pub fn is_shortcut(self) -> bool {
        self.ctrl || self.alt || self.win
    }
}

/// Live modifier flags derived from raw key events.
#[derive(Debug, Default)]
pub struct ModifierTracker {
    state: ModifierState,
}

impl ModifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag for `vk` to `is_pressed`. Non-modifier keys are ignored.
    pub fn update_from_key(&mut self, vk: u32, is_pressed: bool) {
        match vk {
            VK_SHIFT | VK_LSHIFT | VK_RSHIFT => self.state.shift = is_pressed,
            VK_CONTROL | VK_LCONTROL | VK_RCONTROL => self.state.ctrl = is_pressed,
            VK_MENU | VK_LMENU | VK_RMENU => self.state.alt = is_pressed,
            VK_LWIN | VK_RWIN => self.state.win = is_pressed,
            _ => {}
        }
    }

    pub fn snapshot(&self) -> ModifierState {
        self.state
    }

    pub fn is_modifier_key(vk: u32) -> bool {
        is_modifier_key(vk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_and_right_variants_drive_the_same_flag() {
        let mut t = ModifierTracker::new();
        t.update_from_key(VK_LSHIFT, true);
        assert!(t.snapshot().shift);
        t.update_from_key(VK_RSHIFT, false);
        assert!(!t.snapshot().shift);

        t.update_from_key(VK_RCONTROL, true);
        t.update_from_key(VK_LMENU, true);
        t.update_from_key(VK_RWIN, true);
        assert_eq!(
            t.snapshot(),
            ModifierState {
                shift: false,
                ctrl: true,
                alt: true,
                win: true,
            }
        );
    }

    #[test]
    fn content_keys_do_not_touch_flags() {
        let mut t = ModifierTracker::new();
        t.update_from_key(u32::from(b'A'), true);
        assert_eq!(t.snapshot(), ModifierState::NONE);
        assert!(!ModifierTracker::is_modifier_key(u32::from(b'A')));
    }

    #[test]
    fn shortcut_detection_ignores_shift() {
        assert!(!ModifierState::SHIFT.is_shortcut());
        assert_eq!(ModifierState::SHIFT.shift_state(), ShiftState::Shifted);
        let ctrl = ModifierState {
            ctrl: true,
            ..ModifierState::NONE
        };
        assert!(ctrl.is_shortcut());
    }
}
