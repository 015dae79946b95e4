use crate::{
    keys::VK_COUNT,
    layout::{KeyboardHost, LayoutId, ShiftState},
};

/// Characters copied through untouched: they are not letter keys.
fn passes_through(ch: char) -> bool {
    ch.is_whitespace() || ch.is_ascii_punctuation()
}

/// Finds the physical key behind `ch` under `layout`.
///
/// Ties resolve to the lowest virtual key, unshifted before shifted.
pub fn key_for_char(
    host: &impl KeyboardHost,
    ch: char,
    layout: LayoutId,
) -> Option<(u32, ShiftState)> {
    (0..VK_COUNT).find_map(|vk| {
        ShiftState::SEARCH_ORDER
            .into_iter()
            .find(|&shift| host.char_for_key(vk, shift, layout) == Some(ch))
            .map(|shift| (vk, shift))
    })
}

/// `true` when every letter of `text` has a key under `layout`.
///
/// Conversion keeps unmappable characters as they are, so this tells a real
/// rendering apart from one that merely copied the source through.
pub fn is_typeable(text: &str, host: &impl KeyboardHost, layout: LayoutId) -> bool {
    text.chars()
        .filter(|&ch| !passes_through(ch))
        .all(|ch| key_for_char(host, ch, layout).is_some())
}

/// Retypes `text`, produced under `active`, as if the same keys were pressed under `target`.
///
/// The output always has the same number of characters as the input: anything
/// that cannot be mapped is kept as is.
#[must_use]
pub fn convert(
    text: &str,
    host: &impl KeyboardHost,
    active: LayoutId,
    target: LayoutId,
) -> String {
    let mut out = String::with_capacity(text.len().saturating_mul(2));

    for ch in text.chars() {
        if passes_through(ch) {
            out.push(ch);
            continue;
        }

        let mapped = key_for_char(host, ch, active)
            .and_then(|(vk, shift)| host.char_for_key(vk, shift, target));

        out.push(mapped.unwrap_or(ch));
    }

    out
}
