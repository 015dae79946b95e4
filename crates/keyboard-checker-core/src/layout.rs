use std::fmt;

use crate::error::CheckerError;

/// Opaque layout handle handed out by the host (an `HKL` value on Windows).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayoutId(pub usize);

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShiftState {
    Unshifted,
    Shifted,
}

impl ShiftState {
    /// Probe order used when searching for the key behind a character.
    pub const SEARCH_ORDER: [Self; 2] = [Self::Unshifted, Self::Shifted];
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutDescriptor {
    pub id: LayoutId,
    pub display_name: String,
    /// Primary language identifier (low 10 bits of a Windows `LANGID`).
    pub primary_language: u16,
}

/// Extracts the primary language from a full language identifier.
pub const fn primary_language(langid: u16) -> u16 {
    langid & 0x03FF
}

/// Keyboard services provided by the host environment.
///
/// The core never implements key mapping itself; every lookup returns `None`
/// when the host has no answer.
pub trait KeyboardHost {
    /// Installed layouts in the host's order.
    fn installed_layouts(&self) -> Result<Vec<LayoutId>, CheckerError>;

    /// Resolves display name and language for `id`, or `None` if unresolvable.
    fn describe(&self, id: LayoutId) -> Option<LayoutDescriptor>;

    /// Layout currently used by the focused application.
    fn active_layout(&self) -> Option<LayoutId>;

    /// Character produced by `vk` with `shift` under `layout`.
    fn char_for_key(&self, vk: u32, shift: ShiftState, layout: LayoutId) -> Option<char>;
}

/// Installed layouts, enumerated once at startup and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct LayoutRegistry {
    layouts: Vec<LayoutDescriptor>,
}

impl LayoutRegistry {
    pub fn from_descriptors(layouts: Vec<LayoutDescriptor>) -> Self {
        Self { layouts }
    }

    /// Queries the host for all installed layouts.
    ///
    /// Layouts without a resolvable descriptor are skipped and logged.
    #[tracing::instrument(level = "debug", skip(host))]
    pub fn enumerate(host: &impl KeyboardHost) -> Result<Self, CheckerError> {
        let ids = host.installed_layouts()?;

        let mut layouts = Vec::with_capacity(ids.len());
        for id in ids {
            match host.describe(id) {
                Some(d) => {
                    tracing::info!(layout = %id, name = %d.display_name, lang = d.primary_language, "registered layout");
                    layouts.push(d);
                }
                None => tracing::warn!(layout = %id, "skipping layout without descriptor"),
            }
        }

        if layouts.is_empty() {
            return Err(CheckerError::NoLayouts);
        }

        Ok(Self { layouts })
    }

    pub fn get(&self, id: LayoutId) -> Option<&LayoutDescriptor> {
        self.layouts.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutDescriptor> {
        self.layouts.iter()
    }

    /// Every registered layout except `active`, in enumeration order.
    pub fn alternates(&self, active: LayoutId) -> impl Iterator<Item = &LayoutDescriptor> {
        self.layouts.iter().filter(move |d| d.id != active)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::tests::fake_host::{EN_US, FakeHost, HE_IL, RU_RU};

    #[traced_test]
    #[test]
    fn enumerate_skips_layouts_without_descriptor() {
        let host = FakeHost::standard().with_undescribed(LayoutId(0xdead));
        let registry = LayoutRegistry::enumerate(&host).expect("registry");

        let ids: Vec<_> = registry.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![EN_US, HE_IL, RU_RU]);
        assert!(logs_contain("skipping layout without descriptor"));
    }

    #[test]
    fn enumerate_fails_when_host_cannot_list() {
        let host = FakeHost::standard().failing_enumeration();
        let err = LayoutRegistry::enumerate(&host).unwrap_err();
        assert!(matches!(err, CheckerError::LayoutEnumeration(_)));
    }

    #[test]
    fn alternates_exclude_active_and_keep_order() {
        let registry = LayoutRegistry::enumerate(&FakeHost::standard()).expect("registry");
        let ids: Vec<_> = registry.alternates(HE_IL).map(|d| d.id).collect();
        assert_eq!(ids, vec![EN_US, RU_RU]);
    }

    #[test]
    fn primary_language_masks_sublanguage() {
        // en-US
        assert_eq!(primary_language(0x0409), 0x09);
        // he-IL
        assert_eq!(primary_language(0x040D), 0x0D);
    }
}
