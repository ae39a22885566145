//! Hub configuration

use serde::Deserialize;

/// Buffer size of each listener when nothing else is configured.
pub const DEFAULT_LISTENER_CAPACITY: usize = 64;

/// What `submit` does when a listener's buffer is full.
///
/// Neither policy ever blocks the publisher or the other listeners of the
/// room. With `DropMessage` the slow listener silently misses messages; this
/// is expected behaviour and is only visible through `ListenerHandle::dropped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum OverflowPolicy {
    /// Skip the message for that listener only.
    #[default]
    #[serde(rename = "drop", alias = "drop_message")]
    DropMessage,
    /// Remove the listener from its room; it then observes
    /// `CloseReason::Evicted`.
    #[serde(rename = "disconnect")]
    Disconnect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// Messages buffered per listener. Values below 1 are treated as 1.
    pub listener_capacity: usize,
    pub overflow_policy: OverflowPolicy,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            listener_capacity: DEFAULT_LISTENER_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
        }
    }
}
