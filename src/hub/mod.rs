//! roomcast hub
//!
//! The hub fans out text messages submitted to a named room to every
//! listener currently open on that room.
//!
//! Public types:
//! - `RoomHub`: registry of rooms and the four operations adapters call.
//! - `ListenerHandle`: a subscriber's receive-only endpoint.
//! - `Message` / `Delivery` / `CloseReason`: what a listener observes.
//! - `HubConfig` / `OverflowPolicy`: buffer size and backpressure policy.

pub mod config;
pub mod engine;
pub mod listener;
pub mod message;
pub(crate) mod room;

pub use config::{HubConfig, OverflowPolicy};
pub use engine::RoomHub;
pub use listener::{ListenerHandle, ListenerId};
pub use message::{CloseReason, Delivery, Message};
