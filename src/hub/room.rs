//! Room management
//!
//! A `Room` holds the registrations of the listeners currently subscribed to
//! one room id. Callers must synchronize access (the hub's registry lock).

use std::collections::HashMap;

use crate::hub::listener::{ListenerId, Registration};

#[derive(Debug)]
pub(crate) struct Room {
    pub name: String,
    listeners: HashMap<ListenerId, Registration>,
}

impl Room {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            listeners: HashMap::new(),
        }
    }

    pub fn register(&mut self, registration: Registration) {
        self.listeners.insert(registration.id(), registration);
    }

    /// Removes a listener. Removing an absent listener is a no-op.
    pub fn unregister(&mut self, id: &ListenerId) -> Option<Registration> {
        self.listeners.remove(id)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Copies the current registrations so delivery can run without the lock.
    pub fn snapshot(&self) -> Vec<Registration> {
        self.listeners.values().cloned().collect()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Registration> + '_ {
        self.listeners.drain().map(|(_, registration)| registration)
    }
}
