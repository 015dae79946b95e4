use std::ops::RangeInclusive;

use crate::layout::LayoutDescriptor;

/// Separators accepted in every script.
const SEPARATORS: [char; 5] = [' ', ',', '.', '/', '-'];

// Primary language identifiers (winnt.h `LANG_*`).
const LANG_ARABIC: u16 = 0x01;
const LANG_BULGARIAN: u16 = 0x02;
const LANG_GREEK: u16 = 0x08;
const LANG_HEBREW: u16 = 0x0D;
const LANG_RUSSIAN: u16 = 0x19;
const LANG_THAI: u16 = 0x1E;
const LANG_UKRAINIAN: u16 = 0x22;
const LANG_BELARUSIAN: u16 = 0x23;
const LANG_PERSIAN: u16 = 0x29;
const LANG_ARMENIAN: u16 = 0x2B;
const LANG_GEORGIAN: u16 = 0x37;

/// Script membership rule applied to candidates for one layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptPolicy {
    /// Latin-based layouts: no script restriction. Typeability is checked
    /// separately by the pass.
    Unrestricted,
    /// Every non-separator character must fall inside `block`.
    Block {
        script: &'static str,
        block: RangeInclusive<u32>,
    },
}

impl ScriptPolicy {
    pub fn for_language(primary_language: u16) -> Self {
        let (script, block) = match primary_language {
            LANG_HEBREW => ("Hebrew", 0x05D0..=0x05EA),
            LANG_RUSSIAN | LANG_UKRAINIAN | LANG_BELARUSIAN | LANG_BULGARIAN => {
                ("Cyrillic", 0x0400..=0x04FF)
            }
            LANG_GREEK => ("Greek", 0x0370..=0x03FF),
            LANG_ARABIC | LANG_PERSIAN => ("Arabic", 0x0600..=0x06FF),
            LANG_ARMENIAN => ("Armenian", 0x0530..=0x058F),
            LANG_GEORGIAN => ("Georgian", 0x10A0..=0x10FF),
            LANG_THAI => ("Thai", 0x0E00..=0x0E7F),
            _ => return Self::Unrestricted,
        };
        Self::Block { script, block }
    }

    pub fn accepts(&self, text: &str) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Block { block, .. } => text
                .chars()
                .filter(|ch| !SEPARATORS.contains(ch))
                .all(|ch| block.contains(&u32::from(ch))),
        }
    }
}

/// Coarse plausibility check: does `text` look like it belongs to `layout`'s script?
///
/// This confirms script membership only, not that the text is a real word.
pub fn is_plausible(text: &str, layout: &LayoutDescriptor) -> bool {
    !text.is_empty() && ScriptPolicy::for_language(layout.primary_language).accepts(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutId;

    fn layout(primary_language: u16) -> LayoutDescriptor {
        LayoutDescriptor {
            id: LayoutId(usize::from(primary_language)),
            display_name: String::new(),
            primary_language,
        }
    }

    #[test]
    fn hebrew_requires_hebrew_block() {
        let he = layout(LANG_HEBREW);
        assert!(is_plausible("שלום", &he));
        assert!(!is_plausible("abc", &he));
        assert!(!is_plausible("שלוםa", &he));
    }

    #[test]
    fn latin_layouts_accept_anything() {
        let en = layout(0x09);
        assert!(is_plausible("abc", &en));
        assert!(is_plausible("שלום", &en));
    }

    #[test]
    fn separators_are_allowed_inside_blocks() {
        let he = layout(LANG_HEBREW);
        assert!(is_plausible("של, ום./-", &he));
        assert!(!is_plausible("של;ום", &he));
    }

    #[test]
    fn cyrillic_languages_share_the_block() {
        for lang in [LANG_RUSSIAN, LANG_UKRAINIAN, LANG_BELARUSIAN, LANG_BULGARIAN] {
            assert!(is_plausible("привет ёж", &layout(lang)));
            assert!(!is_plausible("ghbdtn", &layout(lang)));
        }
    }

    #[test]
    fn empty_text_is_never_plausible() {
        assert!(!is_plausible("", &layout(0x09)));
    }

    #[test]
    fn unknown_languages_are_unrestricted() {
        assert_eq!(ScriptPolicy::for_language(0x3FF), ScriptPolicy::Unrestricted);
    }
}
