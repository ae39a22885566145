//! The `console` module drives the hub from line-oriented text input.
//!
//! It stands in for a network adapter: each `join` opens a listener and
//! spawns a task that renders deliveries until the room is deleted or the
//! listener is left, and the other commands map one-to-one onto hub
//! operations.

pub mod command;
pub mod input;
pub mod session;

pub use command::Command;
pub use input::{spawn_line_reader, stdin_lines};
pub use session::Console;

#[cfg(test)]
mod tests;
