//! Disposable subscription handle

use super::hub::{Registry, SubscriptionId};
use std::sync::{Mutex, PoisonError, Weak};
use tracing::trace;

/// Handle for one listener registration.
///
/// The listener stays registered while this handle is alive. Call
/// [`unsubscribe`](Self::unsubscribe) or drop the handle to remove it, or
/// [`detach`](Self::detach) to keep it registered for the hub's lifetime.
#[must_use = "dropping a Subscription unregisters its listener immediately"]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<Mutex<Registry>>,
    active: bool,
}

impl Subscription {
    pub(super) fn new(id: SubscriptionId, registry: Weak<Mutex<Registry>>) -> Self {
        Self {
            id,
            registry,
            active: true,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Whether the listener is still registered with a live hub
    pub fn is_active(&self) -> bool {
        if !self.active {
            return false;
        }
        match self.registry.upgrade() {
            Some(registry) => registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(self.id),
            None => false,
        }
    }

    /// Remove the listener now
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keep the listener registered until the hub itself is dropped
    pub fn detach(mut self) {
        self.active = false;
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(self.id);
            trace!(subscription = self.id, "Listener unsubscribed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
