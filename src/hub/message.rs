//! Message and delivery types
//!
//! `Message` is the immutable value handed to every listener of a room.
//! Listeners never see a bare message on their endpoint; they see a
//! `Delivery`, which is either a message or the terminal close signal.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A text message submitted to a room.
///
/// Messages carry no identity beyond their content and are not retained
/// once every listener has been offered a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub user_id: String,
    pub room_id: String,
    pub text: String,
}

impl Message {
    pub fn new(
        user_id: impl Into<String>,
        room_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            room_id: room_id.into(),
            text: text.into(),
        }
    }
}

/// Renders the message the way a chat stream shows it: `alice → hi`.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.user_id, self.text)
    }
}

/// Why a listener stopped receiving messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// The owner released the listener with `close_listener`.
    Unsubscribed,
    /// The room was torn down with `delete_broadcast`.
    RoomDeleted,
    /// The listener's buffer was full under `OverflowPolicy::Disconnect`.
    Evicted,
    /// Every handle to the hub was dropped.
    HubDropped,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            CloseReason::Unsubscribed => "unsubscribed",
            CloseReason::RoomDeleted => "room deleted",
            CloseReason::Evicted => "evicted as a slow consumer",
            CloseReason::HubDropped => "hub dropped",
        };
        f.write_str(reason)
    }
}

/// What a listener observes on each receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Message(Arc<Message>),
    Closed(CloseReason),
}

impl Delivery {
    pub fn is_closed(&self) -> bool {
        matches!(self, Delivery::Closed(_))
    }

    /// Returns the message, if this delivery carries one.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Delivery::Message(msg) => Some(&**msg),
            Delivery::Closed(_) => None,
        }
    }
}
