use std::{cell::Cell, collections::HashMap};

use crate::{
    error::CheckerError,
    layout::{KeyboardHost, LayoutDescriptor, LayoutId, ShiftState},
};

pub const EN_US: LayoutId = LayoutId(0x0409_0409);
pub const HE_IL: LayoutId = LayoutId(0x040D_040D);
pub const RU_RU: LayoutId = LayoutId(0x0419_0419);

const OEM_1: u32 = 0xBA;
const OEM_PLUS: u32 = 0xBB;
const OEM_COMMA: u32 = 0xBC;
const OEM_MINUS: u32 = 0xBD;
const OEM_PERIOD: u32 = 0xBE;
const OEM_2: u32 = 0xBF;
const OEM_3: u32 = 0xC0;
const OEM_4: u32 = 0xDB;
const OEM_5: u32 = 0xDC;
const OEM_6: u32 = 0xDD;
const OEM_7: u32 = 0xDE;

type KeyTable = HashMap<(u32, ShiftState), char>;

struct FakeLayout {
    descriptor: LayoutDescriptor,
    keys: KeyTable,
}

/// In-memory host with US English, Hebrew and Russian layouts.
pub struct FakeHost {
    layouts: Vec<FakeLayout>,
    undescribed: Vec<LayoutId>,
    active: Cell<Option<LayoutId>>,
    fail_enumeration: bool,
}

fn build_table(letters: &str, shifted_letters: &str, digits_shifted: &str, oem: &[(u32, char, char)]) -> KeyTable {
    let mut t = KeyTable::new();
    t.insert((0x20, ShiftState::Unshifted), ' ');
    t.insert((0x20, ShiftState::Shifted), ' ');

    for (i, (lo, hi)) in letters.chars().zip(shifted_letters.chars()).enumerate() {
        let vk = u32::from(b'A') + i as u32;
        t.insert((vk, ShiftState::Unshifted), lo);
        t.insert((vk, ShiftState::Shifted), hi);
    }

    for (i, hi) in digits_shifted.chars().enumerate() {
        let vk = u32::from(b'0') + i as u32;
        let lo = char::from_digit(i as u32, 10).unwrap_or('0');
        t.insert((vk, ShiftState::Unshifted), lo);
        t.insert((vk, ShiftState::Shifted), hi);
    }

    for &(vk, lo, hi) in oem {
        t.insert((vk, ShiftState::Unshifted), lo);
        t.insert((vk, ShiftState::Shifted), hi);
    }
    t
}

fn en_us() -> FakeLayout {
    FakeLayout {
        descriptor: LayoutDescriptor {
            id: EN_US,
            display_name: "English (United States)".to_string(),
            primary_language: 0x09,
        },
        keys: build_table(
            "abcdefghijklmnopqrstuvwxyz",
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            ")!@#$%^&*(",
            &[
                (OEM_1, ';', ':'),
                (OEM_PLUS, '=', '+'),
                (OEM_COMMA, ',', '<'),
                (OEM_MINUS, '-', '_'),
                (OEM_PERIOD, '.', '>'),
                (OEM_2, '/', '?'),
                (OEM_3, '`', '~'),
                (OEM_4, '[', '{'),
                (OEM_5, '\\', '|'),
                (OEM_6, ']', '}'),
                (OEM_7, '\'', '"'),
            ],
        ),
    }
}

fn he_il() -> FakeLayout {
    FakeLayout {
        descriptor: LayoutDescriptor {
            id: HE_IL,
            display_name: "Hebrew (Israel)".to_string(),
            primary_language: 0x0D,
        },
        keys: build_table(
            "שנבגקכעיןחלךצמםפ/רדאוה'סטז",
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            ")!@#$%^&*(",
            &[
                (OEM_1, 'ף', ':'),
                (OEM_PLUS, '=', '+'),
                (OEM_COMMA, 'ת', '>'),
                (OEM_MINUS, '-', '_'),
                (OEM_PERIOD, 'ץ', '<'),
                (OEM_2, '.', '?'),
                (OEM_3, ';', '~'),
                (OEM_4, ']', '}'),
                (OEM_5, '\\', '|'),
                (OEM_6, '[', '{'),
                (OEM_7, ',', '"'),
            ],
        ),
    }
}

fn ru_ru() -> FakeLayout {
    FakeLayout {
        descriptor: LayoutDescriptor {
            id: RU_RU,
            display_name: "Russian (Russia)".to_string(),
            primary_language: 0x19,
        },
        keys: build_table(
            "фисвуапршолдьтщзйкыегмцчня",
            "ФИСВУАПРШОЛДЬТЩЗЙКЫЕГМЦЧНЯ",
            ")!\"№;%:?*(",
            &[
                (OEM_1, 'ж', 'Ж'),
                (OEM_PLUS, '=', '+'),
                (OEM_COMMA, 'б', 'Б'),
                (OEM_MINUS, '-', '_'),
                (OEM_PERIOD, 'ю', 'Ю'),
                (OEM_2, '.', ','),
                (OEM_3, 'ё', 'Ё'),
                (OEM_4, 'х', 'Х'),
                (OEM_5, '\\', '/'),
                (OEM_6, 'ъ', 'Ъ'),
                (OEM_7, 'э', 'Э'),
            ],
        ),
    }
}

impl FakeHost {
    pub fn standard() -> Self {
        Self {
            layouts: vec![en_us(), he_il(), ru_ru()],
            undescribed: Vec::new(),
            active: Cell::new(Some(EN_US)),
            fail_enumeration: false,
        }
    }

    pub fn with_undescribed(mut self, id: LayoutId) -> Self {
        self.undescribed.push(id);
        self
    }

    pub fn failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    pub fn set_active(&self, id: Option<LayoutId>) {
        self.active.set(id);
    }

    fn layout(&self, id: LayoutId) -> Option<&FakeLayout> {
        self.layouts.iter().find(|l| l.descriptor.id == id)
    }
}

impl KeyboardHost for FakeHost {
    fn installed_layouts(&self) -> Result<Vec<LayoutId>, CheckerError> {
        if self.fail_enumeration {
            return Err(CheckerError::LayoutEnumeration("host refused".to_string()));
        }
        let mut ids: Vec<_> = self.layouts.iter().map(|l| l.descriptor.id).collect();
        ids.extend(self.undescribed.iter().copied());
        Ok(ids)
    }

    fn describe(&self, id: LayoutId) -> Option<LayoutDescriptor> {
        self.layout(id).map(|l| l.descriptor.clone())
    }

    fn active_layout(&self) -> Option<LayoutId> {
        self.active.get()
    }

    fn char_for_key(&self, vk: u32, shift: ShiftState, layout: LayoutId) -> Option<char> {
        self.layout(layout)?.keys.get(&(vk, shift)).copied()
    }
}
