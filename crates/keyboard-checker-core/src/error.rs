use thiserror::Error;

/// Failures the core reports to its caller.
///
/// Per-key and per-character lookups never produce these: they return `None`
/// and the caller falls back. Only setup problems surface as errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckerError {
    /// A second context registration was attempted for the interception callback.
    #[error("keyboard checker context is already registered")]
    AlreadyRegistered,

    /// The host could not list its installed layouts.
    #[error("failed to enumerate keyboard layouts: {0}")]
    LayoutEnumeration(String),

    /// The host listed layouts but none of them could be described.
    #[error("no usable keyboard layouts found")]
    NoLayouts,
}
