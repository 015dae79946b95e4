//! Hand-off between the interception callback and the deferred conversion pass.
//!
//! The callback must return quickly, so it only drops the newest request into a
//! single slot. Whoever drains the slot always sees the latest request; older
//! ones are overwritten, never queued.

use std::sync::{
    Mutex,
    atomic::{AtomicU64, Ordering},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassRequest {
    /// Convert this buffer text across the alternate layouts.
    Convert { text: String },
    /// Hide any suggestion currently shown.
    Withdraw,
}

/// A request taken out of the slot, stamped with the offer it came from.
#[derive(Debug)]
pub struct Ticket {
    pub request: PassRequest,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct RecomputeSlot {
    pending: Mutex<Option<PassRequest>>,
    generation: AtomicU64,
}

impl RecomputeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `request`, replacing anything not yet taken.
    ///
    /// Returns `true` if the slot was empty, i.e. the caller has to schedule
    /// one wake-up. A `false` means a wake-up is already on its way.
    pub fn offer(&self, request: PassRequest) -> bool {
        let Ok(mut pending) = self.pending.lock() else {
            tracing::warn!("recompute slot lock poisoned");
            return false;
        };
        self.generation.fetch_add(1, Ordering::AcqRel);
        pending.replace(request).is_none()
    }

    pub fn take(&self) -> Option<Ticket> {
        let mut pending = self.pending.lock().ok()?;
        let request = pending.take()?;
        Some(Ticket {
            request,
            generation: self.generation.load(Ordering::Acquire),
        })
    }

    /// `false` once a newer request has been offered after `ticket` was taken.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.generation
    }
}
