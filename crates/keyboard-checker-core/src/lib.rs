//! Wrong-layout detection core.
//!
//! Tracks held keys and modifiers, keeps a rolling text buffer built from raw
//! virtual key codes, and reconstructs that text as it would have appeared
//! under every other installed keyboard layout. Everything that touches the
//! operating system goes through [`layout::KeyboardHost`], so the whole crate
//! is platform independent and tested against a fake host.

pub mod buffer;
pub mod checker;
pub mod convert;
pub mod error;
pub mod keys;
pub mod layout;
pub mod modifiers;
pub mod pass;
pub mod registration;
pub mod schedule;
pub mod validity;

pub use buffer::{KeyEvent, KeystrokeBuffer, TextRetention};
pub use checker::{CheckerSettings, KeyboardChecker};
pub use convert::{convert, is_typeable};
pub use error::CheckerError;
pub use layout::{KeyboardHost, LayoutDescriptor, LayoutId, LayoutRegistry, ShiftState};
pub use modifiers::{ModifierState, ModifierTracker};
pub use pass::{
    ConversionCandidate, PassOutcome, SkipReason, SuggestionNotifier, Suggestions, candidates,
    drain, format_suggestions, run_pass,
};
pub use registration::Registration;
pub use schedule::{PassRequest, RecomputeSlot, Ticket};
pub use validity::{ScriptPolicy, is_plausible};

#[cfg(test)]
pub(crate) mod tests;
