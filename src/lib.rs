//! # roomcast
//!
//! `roomcast` is an in-process, in-memory room broadcast hub. Messages
//! submitted to a named room fan out to every listener currently open on
//! that room; slow listeners are handled by a configurable backpressure
//! policy instead of stalling the publisher.
//!
//! ## Core Modules
//!
//! - `hub`: the registry of rooms and the four operations (open listener,
//!   close listener, submit, delete broadcast).
//! - `config`: loads settings from an optional file and the environment.
//! - `console`: a line-oriented driver used by the `roomcast` binary.
//! - `utils`: shared error types and logging setup.
//!
//! ## Example
//!
//! ```rust
//! use roomcast::hub::{Delivery, RoomHub};
//!
//! let hub = RoomHub::new();
//! let mut listener = hub.open_listener("lobby");
//!
//! hub.submit("alice", "lobby", "hi");
//! match listener.try_recv() {
//!     Some(Delivery::Message(msg)) => assert_eq!(msg.to_string(), "alice → hi"),
//!     other => panic!("unexpected delivery: {other:?}"),
//! }
//!
//! hub.close_listener("lobby", &listener);
//! ```

pub mod config;
pub mod console;
pub mod hub;
pub mod utils;
