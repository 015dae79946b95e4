use std::{collections::BTreeMap, fmt::Write as _};

use crate::{
    convert::{convert, is_typeable},
    layout::{KeyboardHost, LayoutId, LayoutRegistry},
    schedule::{PassRequest, RecomputeSlot},
    validity::is_plausible,
};

/// Alternate layout -> converted and validated text.
pub type Suggestions = BTreeMap<LayoutId, String>;

/// Presents the result of a completed pass. An empty map means "hide".
pub trait SuggestionNotifier {
    fn present(&mut self, current_text: &str, suggestions: &Suggestions);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    Suggested(Suggestions),
    Withdrawn,
    Skipped(SkipReason),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NoActiveLayout,
    Superseded,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::NoActiveLayout => "no_active_layout",
            SkipReason::Superseded => "superseded",
        }
    }
}

/// One alternate rendering of the buffer text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionCandidate {
    pub layout: LayoutId,
    pub text: String,
    /// Plausible for `layout` and every character is typeable there.
    pub is_valid: bool,
}

/// Converts `text` into every alternate of `active`.
///
/// Renderings identical to the source are left out; there is nothing to fix.
pub fn candidates(
    registry: &LayoutRegistry,
    host: &impl KeyboardHost,
    active: LayoutId,
    text: &str,
) -> Vec<ConversionCandidate> {
    registry
        .alternates(active)
        .filter_map(|target| {
            let converted = convert(text, host, active, target.id);
            if converted == text {
                return None;
            }

            let is_valid =
                is_plausible(&converted, target) && is_typeable(&converted, host, target.id);
            Some(ConversionCandidate {
                layout: target.id,
                text: converted,
                is_valid,
            })
        })
        .collect()
}

/// Converts `text` into every non-active layout and keeps the valid results.
///
/// The active layout is queried on every call since the user may switch
/// layouts between keystrokes.
pub fn run_pass(registry: &LayoutRegistry, host: &impl KeyboardHost, text: &str) -> PassOutcome {
    let Some(active) = host.active_layout() else {
        return PassOutcome::Skipped(SkipReason::NoActiveLayout);
    };

    let mut suggestions = Suggestions::new();
    for candidate in candidates(registry, host, active, text) {
        if candidate.is_valid {
            suggestions.insert(candidate.layout, candidate.text);
        } else {
            tracing::trace!(layout = %candidate.layout, "candidate rejected");
        }
    }

    tracing::debug!(%active, text_len = text.chars().count(), found = suggestions.len(), "conversion pass");
    PassOutcome::Suggested(suggestions)
}

/// Runs the latest pending request, if any, and notifies once.
///
/// A result overtaken by a newer request while it was computed is dropped
/// without notifying; the newer request has its own wake-up.
pub fn drain(
    slot: &RecomputeSlot,
    registry: &LayoutRegistry,
    host: &impl KeyboardHost,
    notifier: &mut impl SuggestionNotifier,
) -> Option<PassOutcome> {
    let ticket = slot.take()?;

    let (text, outcome) = match &ticket.request {
        PassRequest::Convert { text } => (text.as_str(), run_pass(registry, host, text)),
        PassRequest::Withdraw => ("", PassOutcome::Withdrawn),
    };

    if !slot.is_current(&ticket) {
        return Some(PassOutcome::Skipped(SkipReason::Superseded));
    }

    match &outcome {
        PassOutcome::Suggested(suggestions) => {
            // Typed text never goes to the log, only its size.
            if !suggestions.is_empty() {
                tracing::info!(
                    text_len = text.chars().count(),
                    suggestions = suggestions.len(),
                    "presenting suggestions"
                );
            }
            notifier.present(text, suggestions);
        }
        PassOutcome::Withdrawn => notifier.present(text, &Suggestions::new()),
        PassOutcome::Skipped(reason) => {
            tracing::debug!(reason = reason.as_str(), "conversion pass skipped");
        }
    }

    Some(outcome)
}

/// Popup body: the current text followed by one line per suggesting layout.
pub fn format_suggestions(
    current_text: &str,
    suggestions: &Suggestions,
    registry: &LayoutRegistry,
) -> String {
    let mut out = format!("Current text: {current_text}\n\nSuggestions:\n");
    for layout in registry.iter() {
        if let Some(text) = suggestions.get(&layout.id) {
            // `String` implements `fmt::Write` infallibly.
            let _ = writeln!(out, "{}: {text}", layout.display_name);
        }
    }
    out
}
