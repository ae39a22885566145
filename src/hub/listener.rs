//! Listener endpoints
//!
//! A listener is split in two halves that share a small `ListenerState`:
//! - `Registration` is the hub-side, non-owning entry kept in a room. It holds
//!   the sending half of a bounded channel.
//! - `ListenerHandle` is owned by the consumer and is the only reader.
//!
//! Closing is signalled by dropping every sending half. The reason is
//! recorded in the shared state first, so the consumer sees
//! `Delivery::Closed(reason)` once it has drained whatever was buffered.

use std::fmt;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};
use uuid::Uuid;

use crate::hub::message::{CloseReason, Delivery, Message};

/// Identity of a listener. Unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

#[derive(Debug, Default)]
struct ListenerState {
    close_reason: OnceLock<CloseReason>,
    dropped: AtomicU64,
}

/// Creates a connected registration/handle pair for `room_id`.
pub(crate) fn channel(room_id: &str, capacity: usize) -> (Registration, ListenerHandle) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let id = ListenerId::new();
    let state = Arc::new(ListenerState::default());

    let registration = Registration {
        id,
        sender,
        state: Arc::clone(&state),
    };
    let handle = ListenerHandle {
        id,
        room_id: room_id.to_string(),
        receiver,
        state,
    };
    (registration, handle)
}

/// Hub-side entry for one listener.
#[derive(Debug, Clone)]
pub(crate) struct Registration {
    id: ListenerId,
    sender: mpsc::Sender<Arc<Message>>,
    state: Arc<ListenerState>,
}

impl Registration {
    pub(crate) fn id(&self) -> ListenerId {
        self.id
    }

    /// Offers a message without waiting for buffer space.
    pub(crate) fn try_deliver(&self, message: &Arc<Message>) -> Result<(), TrySendError<()>> {
        self.sender
            .try_send(Arc::clone(message))
            .map_err(|err| match err {
                TrySendError::Full(_) => TrySendError::Full(()),
                TrySendError::Closed(_) => TrySendError::Closed(()),
            })
    }

    /// Counts a message lost to a full buffer and returns the new total.
    pub(crate) fn record_drop(&self) -> u64 {
        self.state.dropped.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records why the listener ended and releases this sending half.
    ///
    /// The first recorded reason wins. Clones held by an in-flight submit
    /// keep the channel open until that submit returns.
    pub(crate) fn close(self, reason: CloseReason) {
        let _ = self.state.close_reason.set(reason);
    }
}

/// Receive-only view of a listener, owned by the subscriber that opened it.
///
/// Messages arrive in the order they were submitted to the room. After the
/// listener is closed, buffered messages are still returned first, then every
/// further receive yields `Delivery::Closed`.
#[derive(Debug)]
pub struct ListenerHandle {
    id: ListenerId,
    room_id: String,
    receiver: mpsc::Receiver<Arc<Message>>,
    state: Arc<ListenerState>,
}

impl ListenerHandle {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Waits for the next message or the close signal.
    ///
    /// Cancel safe: dropping the future before it completes loses nothing,
    /// so it can sit in a `tokio::select!` next to a disconnect signal.
    pub async fn recv(&mut self) -> Delivery {
        match self.receiver.recv().await {
            Some(message) => Delivery::Message(message),
            None => Delivery::Closed(self.terminal_reason()),
        }
    }

    /// Returns the next delivery if one is ready, `None` if the buffer is
    /// empty and the listener is still open.
    pub fn try_recv(&mut self) -> Option<Delivery> {
        match self.receiver.try_recv() {
            Ok(message) => Some(Delivery::Message(message)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Delivery::Closed(self.terminal_reason())),
        }
    }

    /// Why the hub released this listener, if it has.
    ///
    /// Set as soon as the hub lets go; buffered messages may still be pending.
    pub fn close_reason(&self) -> Option<CloseReason> {
        self.state.close_reason.get().copied()
    }

    /// Number of messages this listener missed because its buffer was full.
    pub fn dropped(&self) -> u64 {
        self.state.dropped.load(Ordering::Relaxed)
    }

    fn terminal_reason(&self) -> CloseReason {
        self.close_reason().unwrap_or(CloseReason::HubDropped)
    }
}

/// Yields messages until the listener is closed.
impl Stream for ListenerHandle {
    type Item = Arc<Message>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
