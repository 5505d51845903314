//! Observer list for registry state transitions

use std::sync::{Arc, PoisonError, RwLock};

#[cfg(test)]
use mockall::automock;

use crate::version::types::UpdateVerdict;

/// Receives registry events. Both methods default to doing nothing.
#[cfg_attr(test, automock)]
pub trait RegistryListener: Send + Sync {
    /// Fired once per successful registration
    fn on_registered(&self, _id: &str, _version: &str) {}

    /// Fired after every check that finds a newer version
    fn on_update_available(&self, _id: &str, _verdict: &UpdateVerdict) {}
}

/// Current subscribers, invoked synchronously with no ordering guarantee
#[derive(Default)]
pub struct Listeners {
    listeners: RwLock<Vec<Arc<dyn RegistryListener>>>,
}

impl Listeners {
    pub fn subscribe(&self, listener: Arc<dyn RegistryListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn registered(&self, id: &str, version: &str) {
        for listener in self.snapshot() {
            listener.on_registered(id, version);
        }
    }

    pub(crate) fn update_available(&self, verdict: &UpdateVerdict) {
        for listener in self.snapshot() {
            listener.on_update_available(&verdict.component_id, verdict);
        }
    }

    /// Clone the list so handlers run without holding the lock
    fn snapshot(&self) -> Vec<Arc<dyn RegistryListener>> {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
