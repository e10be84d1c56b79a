//! Listener registry and synchronous dispatch

use super::subscription::Subscription;
use crate::ports::change_listener::ChangeListener;
use outlog_domain::{ChangeSignal, SignalName};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace};

/// Identifier assigned to each registration, unique per hub.
pub type SubscriptionId = u64;

/// Listeners in registration order.
#[derive(Default)]
pub(crate) struct Registry {
    next_id: SubscriptionId,
    listeners: Vec<(SubscriptionId, Arc<dyn ChangeListener>)>,
}

impl Registry {
    fn insert(&mut self, listener: Arc<dyn ChangeListener>) -> SubscriptionId {
        self.next_id += 1;
        let id = self.next_id;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }

    pub(crate) fn contains(&self, id: SubscriptionId) -> bool {
        self.listeners.iter().any(|(existing, _)| *existing == id)
    }

    fn snapshot(&self) -> Vec<Arc<dyn ChangeListener>> {
        self.listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }
}

/// Named broadcast point for [`ChangeSignal`]s.
///
/// Cloning a hub shares its registry.
#[derive(Clone, Default)]
pub struct SignalHub {
    name: SignalName,
    registry: Arc<Mutex<Registry>>,
}

impl SignalHub {
    pub fn new(name: SignalName) -> Self {
        Self {
            name,
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    pub fn name(&self) -> &SignalName {
        &self.name
    }

    /// Register a listener; it stays registered while the returned handle lives.
    pub fn subscribe(&self, listener: impl ChangeListener + 'static) -> Subscription {
        self.subscribe_shared(Arc::new(listener))
    }

    /// Register a listener that is also held elsewhere.
    pub fn subscribe_shared(&self, listener: Arc<dyn ChangeListener>) -> Subscription {
        let id = self.lock().insert(listener);
        trace!(signal = %self.name, subscription = id, "Listener subscribed");
        Subscription::new(id, Arc::downgrade(&self.registry))
    }

    /// Deliver one signal to every listener registered at this moment.
    ///
    /// Listeners run after the registry lock is released, so they may
    /// subscribe or unsubscribe; such changes apply from the next dispatch.
    /// Returns the number of listeners notified.
    pub fn dispatch(&self) -> usize {
        let listeners = self.lock().snapshot();
        debug!(signal = %self.name, listeners = listeners.len(), "Dispatching change signal");
        for listener in &listeners {
            listener.on_change(ChangeSignal);
        }
        listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalHub")
            .field("name", &self.name)
            .field("listeners", &self.listener_count())
            .finish()
    }
}
