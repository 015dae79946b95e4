use std::sync::OnceLock;

use crate::error::CheckerError;

/// Write-once link from a context-free host callback to its context object.
///
/// Host interception callbacks carry no user data, so the adapter keeps one
/// `static Registration` and the entry point registers its context exactly once.
pub struct Registration<T: 'static> {
    target: OnceLock<&'static T>,
}

impl<T: 'static> Registration<T> {
    pub const fn new() -> Self {
        Self {
            target: OnceLock::new(),
        }
    }

    /// Fails with [`CheckerError::AlreadyRegistered`] on any second call.
    pub fn register(&self, target: &'static T) -> Result<(), CheckerError> {
        self.target
            .set(target)
            .map_err(|_| CheckerError::AlreadyRegistered)
    }

    pub fn get(&self) -> Option<&'static T> {
        self.target.get().copied()
    }

    pub fn is_registered(&self) -> bool {
        self.target.get().is_some()
    }
}

impl<T: 'static> Default for Registration<T> {
    fn default() -> Self {
        Self::new()
    }
}
