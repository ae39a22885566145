use std::collections::HashMap;
use std::future::Future;
use std::io;

use futures::{Stream, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::console::command::Command;
use crate::hub::{Delivery, ListenerHandle, RoomHub};
use crate::utils::error::Result;

struct JoinedRoom {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Console session: executes commands against a hub and writes rendered
/// lines to `out`.
pub struct Console {
    hub: RoomHub,
    out: mpsc::UnboundedSender<String>,
    joined: HashMap<String, JoinedRoom>,
}

impl Console {
    pub fn new(hub: RoomHub, out: mpsc::UnboundedSender<String>) -> Self {
        Self {
            hub,
            out,
            joined: HashMap::new(),
        }
    }

    /// Reads commands until `quit`, end of input or `shutdown` resolves,
    /// then leaves every room.
    ///
    /// `shutdown` is checked before each line, so the loop stops even while
    /// `lines` is still open and idle. Lines that fail to parse are reported
    /// on `out` and skipped.
    pub async fn run<S, F>(&mut self, mut lines: S, shutdown: F) -> Result<()>
    where
        S: Stream<Item = io::Result<String>> + Unpin,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let line = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Console shutdown requested");
                    break;
                }
                line = lines.next() => match line {
                    Some(line) => line?,
                    None => break,
                },
            };

            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(command) => {
                    if !self.execute(command).await {
                        break;
                    }
                }
                Err(err) => {
                    warn!(input = %line, error = %err, "Rejected console input");
                    self.emit(format!("error: {err}"));
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Executes one command. Returns `false` when the session should end.
    pub async fn execute(&mut self, command: Command) -> bool {
        debug!(command = ?command, "Console command");

        match command {
            Command::Join { room } => self.join(room),
            Command::Leave { room } => {
                if self.leave(&room).await {
                    self.emit(format!("left {room}"));
                } else {
                    self.emit(format!("not in {room}"));
                }
            }
            Command::Say { user, room, text } => self.hub.submit(&user, &room, &text),
            Command::Delete { room } => {
                self.hub.delete_broadcast(&room);
                // The listener task sees the close signal and exits on its own.
                if let Some(joined) = self.joined.remove(&room) {
                    let _ = joined.task.await;
                }
                self.emit(format!("deleted {room}"));
            }
            Command::Rooms => {
                let ids = self.hub.room_ids();
                if ids.is_empty() {
                    self.emit("no rooms".to_string());
                }
                for id in ids {
                    let count = self.hub.listener_count(&id);
                    self.emit(format!("{id}: {count} listener(s)"));
                }
            }
            Command::Quit => return false,
        }

        true
    }

    /// Leaves every joined room.
    pub async fn shutdown(&mut self) {
        let rooms: Vec<String> = self.joined.keys().cloned().collect();
        for room in rooms {
            self.leave(&room).await;
        }
    }

    fn join(&mut self, room: String) {
        let already_joined = self
            .joined
            .get(&room)
            .is_some_and(|joined| !joined.task.is_finished());
        if already_joined {
            self.emit(format!("already in {room}"));
            return;
        }

        let handle = self.hub.open_listener(&room);
        let (stop, stop_rx) = oneshot::channel();
        let task = spawn_renderer(self.hub.clone(), handle, stop_rx, self.out.clone());
        self.joined.insert(room.clone(), JoinedRoom { stop, task });

        info!(room_id = %room, "Joined room");
        self.emit(format!("joined {room}"));
    }

    async fn leave(&mut self, room: &str) -> bool {
        let Some(joined) = self.joined.remove(room) else {
            return false;
        };

        let _ = joined.stop.send(());
        let _ = joined.task.await;
        info!(room_id = %room, "Left room");
        true
    }

    fn emit(&self, line: String) {
        let _ = self.out.send(line);
    }
}

/// Renders every delivery of `handle` as `[room] user → text` until the
/// listener closes or `stop` fires, then releases the listener.
///
/// A stop request wins over pending messages, so leaving takes effect at
/// once even while the room is busy.
fn spawn_renderer(
    hub: RoomHub,
    mut handle: ListenerHandle,
    mut stop: oneshot::Receiver<()>,
    out: mpsc::UnboundedSender<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let room = handle.room_id().to_string();

        loop {
            tokio::select! {
                biased;
                _ = &mut stop => break,
                delivery = handle.recv() => match delivery {
                    Delivery::Message(message) => {
                        let _ = out.send(format!("[{room}] {message}"));
                    }
                    Delivery::Closed(reason) => {
                        let _ = out.send(format!("[{room}] closed: {reason}"));
                        break;
                    }
                },
            }
        }

        hub.close_listener(&room, &handle);
    })
}
