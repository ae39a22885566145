//! Hub engine
//!
//! `RoomHub` owns the registry of rooms and implements the four operations
//! adapters call: open a listener, close a listener, submit a message and
//! delete a room's broadcast state.
//!
//! Concurrency notes:
//! - The registry is a single `RwLock<HashMap<..>>`. Open, close and delete
//!   take the write lock for a bounded map update; submit takes the read lock
//!   only long enough to copy the room's registrations.
//! - Delivery happens after the lock is released and uses `try_send`, so a
//!   full listener never stalls the publisher or the rest of the room.
//! - Submit has snapshot semantics. A listener that registers while a submit
//!   is delivering may or may not receive that message, and a listener closed
//!   during delivery may still receive it.
//! - None of the operations return errors. Unknown rooms behave as empty
//!   rooms, and a poisoned lock is recovered rather than propagated.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use crate::hub::config::{HubConfig, OverflowPolicy};
use crate::hub::listener::{self, ListenerHandle, ListenerId};
use crate::hub::message::{CloseReason, Message};
use crate::hub::room::Room;

/// In-process broadcast hub. Cloning is cheap and every clone shares the
/// same registry.
#[derive(Debug, Clone, Default)]
pub struct RoomHub {
    inner: Arc<HubInner>,
}

#[derive(Debug, Default)]
struct HubInner {
    rooms: RwLock<HashMap<String, Room>>,
    config: HubConfig,
}

/// Registrations that must leave their room after a submit.
enum Detach {
    Evict(ListenerId),
    Prune(ListenerId),
}

impl RoomHub {
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    pub fn with_config(config: HubConfig) -> Self {
        Self {
            inner: Arc::new(HubInner {
                rooms: RwLock::new(HashMap::new()),
                config,
            }),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    /// Registers a fresh listener under `room_id`, creating the room if it
    /// does not exist yet.
    pub fn open_listener(&self, room_id: &str) -> ListenerHandle {
        let (registration, handle) = listener::channel(room_id, self.inner.config.listener_capacity);

        let mut rooms = self.write_rooms();
        let room = rooms
            .entry(room_id.to_string())
            .or_insert_with(|| Room::new(room_id));
        room.register(registration);

        debug!(
            room_id = %room_id,
            listener = %handle.id(),
            listeners = room.len(),
            "Listener opened"
        );

        handle
    }

    /// Removes `listener` from `room_id`. The room itself is kept even when
    /// it becomes empty. Closing twice, or closing under the wrong room, is a
    /// silent no-op.
    pub fn close_listener(&self, room_id: &str, listener: &ListenerHandle) {
        let removed = {
            let mut rooms = self.write_rooms();
            rooms
                .get_mut(room_id)
                .and_then(|room| room.unregister(&listener.id()))
        };

        match removed {
            Some(registration) => {
                registration.close(CloseReason::Unsubscribed);
                debug!(room_id = %room_id, listener = %listener.id(), "Listener closed");
            }
            None => {
                debug!(
                    room_id = %room_id,
                    listener = %listener.id(),
                    "Listener already closed or not registered"
                );
            }
        }
    }

    /// Delivers a message from `user_id` to every listener of `room_id`.
    ///
    /// A room nobody listens to drops the message; nothing is retained for
    /// later subscribers. Submitting to an unseen room id creates it empty.
    pub fn submit(&self, user_id: &str, room_id: &str, text: &str) {
        let snapshot = self.read_rooms().get(room_id).map(Room::snapshot);
        let Some(targets) = snapshot else {
            self.write_rooms()
                .entry(room_id.to_string())
                .or_insert_with(|| Room::new(room_id));
            debug!(room_id = %room_id, user_id = %user_id, "Message submitted to new room, no listeners");
            return;
        };

        if targets.is_empty() {
            debug!(room_id = %room_id, user_id = %user_id, "Message submitted, no listeners");
            return;
        }

        let message = Arc::new(Message::new(user_id, room_id, text));
        let policy = self.inner.config.overflow_policy;
        let mut delivered = 0usize;
        let mut dropped = 0usize;
        let mut detach = Vec::new();

        for registration in &targets {
            match registration.try_deliver(&message) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(())) => {
                    dropped += 1;
                    match policy {
                        OverflowPolicy::DropMessage => {
                            let total = registration.record_drop();
                            debug!(
                                room_id = %room_id,
                                listener = %registration.id(),
                                total_dropped = total,
                                "Listener buffer full, message dropped"
                            );
                        }
                        OverflowPolicy::Disconnect => {
                            detach.push(Detach::Evict(registration.id()));
                        }
                    }
                }
                Err(TrySendError::Closed(())) => {
                    detach.push(Detach::Prune(registration.id()));
                }
            }
        }

        debug!(
            room_id = %room_id,
            user_id = %user_id,
            delivered,
            dropped,
            "Message submitted"
        );

        if !detach.is_empty() {
            self.detach(room_id, detach);
        }
    }

    /// Tears down `room_id`. Every listener still registered is closed with
    /// `CloseReason::RoomDeleted`, so consumers waiting on it return instead
    /// of hanging. A later `open_listener` starts a brand-new room.
    pub fn delete_broadcast(&self, room_id: &str) {
        let removed = self.write_rooms().remove(room_id);

        match removed {
            Some(mut room) => {
                let listeners = room.len();
                for registration in room.drain() {
                    registration.close(CloseReason::RoomDeleted);
                }
                info!(room_id = %room.name, listeners, "Room broadcast deleted");
            }
            None => {
                debug!(room_id = %room_id, "Delete requested for unknown room");
            }
        }
    }

    pub fn contains_room(&self, room_id: &str) -> bool {
        self.read_rooms().contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.read_rooms().len()
    }

    /// Registered room ids, sorted.
    pub fn room_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read_rooms().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Listeners currently registered under `room_id`; zero for unknown rooms.
    pub fn listener_count(&self, room_id: &str) -> usize {
        self.read_rooms().get(room_id).map_or(0, Room::len)
    }

    fn detach(&self, room_id: &str, detach: Vec<Detach>) {
        let mut rooms = self.write_rooms();
        // The room may have been deleted (and recreated) since the snapshot.
        let Some(room) = rooms.get_mut(room_id) else {
            return;
        };

        for entry in detach {
            match entry {
                Detach::Evict(id) => {
                    if let Some(registration) = room.unregister(&id) {
                        registration.close(CloseReason::Evicted);
                        warn!(
                            room_id = %room_id,
                            listener = %id,
                            "Slow listener evicted, buffer full"
                        );
                    }
                }
                Detach::Prune(id) => {
                    if room.unregister(&id).is_some() {
                        debug!(room_id = %room_id, listener = %id, "Pruned listener with dropped handle");
                    }
                }
            }
        }
    }

    fn read_rooms(&self) -> RwLockReadGuard<'_, HashMap<String, Room>> {
        self.inner
            .rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_rooms(&self) -> RwLockWriteGuard<'_, HashMap<String, Room>> {
        self.inner
            .rooms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
