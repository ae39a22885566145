use std::future::pending;
use std::io;
use std::time::Duration;

use futures::stream::{self, Stream};
use tokio::sync::{mpsc, oneshot};

use super::{Command, Console, spawn_line_reader};
use crate::hub::RoomHub;

fn script(lines: &[&str]) -> impl Stream<Item = io::Result<String>> + Unpin {
    let lines: Vec<io::Result<String>> = lines.iter().map(|l| Ok(l.to_string())).collect();
    stream::iter(lines)
}

async fn next_line(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("no console output")
        .expect("output closed")
}

fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Ok(line) = rx.try_recv() {
        lines.push(line);
    }
    lines
}

#[test]
fn test_parse_join_leave_delete() {
    assert_eq!(
        "join lobby".parse::<Command>().unwrap(),
        Command::Join {
            room: "lobby".to_string()
        }
    );
    assert_eq!(
        "  leave   lobby ".parse::<Command>().unwrap(),
        Command::Leave {
            room: "lobby".to_string()
        }
    );
    assert_eq!(
        "delete lobby".parse::<Command>().unwrap(),
        Command::Delete {
            room: "lobby".to_string()
        }
    );
}

#[test]
fn test_parse_say_keeps_text_spacing() {
    assert_eq!(
        "say alice lobby hello  there".parse::<Command>().unwrap(),
        Command::Say {
            user: "alice".to_string(),
            room: "lobby".to_string(),
            text: "hello  there".to_string(),
        }
    );
}

#[test]
fn test_parse_simple_commands() {
    assert_eq!("rooms".parse::<Command>().unwrap(), Command::Rooms);
    assert_eq!("quit".parse::<Command>().unwrap(), Command::Quit);
    assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
}

#[test]
fn test_parse_rejects_bad_input() {
    assert!("".parse::<Command>().is_err());
    assert!("join".parse::<Command>().is_err());
    assert!("join two rooms".parse::<Command>().is_err());
    assert!("say alice lobby".parse::<Command>().is_err());
    let err = "shout lobby".parse::<Command>().unwrap_err();
    assert_eq!(err.to_string(), "invalid command: unknown command `shout`");
}

#[tokio::test]
async fn test_joined_room_renders_traffic() {
    let hub = RoomHub::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(hub.clone(), tx);

    console
        .execute("join lobby".parse().unwrap())
        .await;
    assert_eq!(next_line(&mut rx).await, "joined lobby");

    console
        .execute("say alice lobby hi".parse().unwrap())
        .await;
    assert_eq!(next_line(&mut rx).await, "[lobby] alice → hi");

    console
        .execute("leave lobby".parse().unwrap())
        .await;
    assert_eq!(next_line(&mut rx).await, "left lobby");

    console.execute(Command::Rooms).await;
    assert_eq!(next_line(&mut rx).await, "lobby: 0 listener(s)");
    assert_eq!(hub.listener_count("lobby"), 0);
}

#[tokio::test]
async fn test_leave_takes_effect_with_messages_pending() {
    let hub = RoomHub::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(hub.clone(), tx);

    console
        .execute("join lobby".parse().unwrap())
        .await;
    for i in 0..10 {
        hub.submit("bob", "lobby", &i.to_string());
    }
    console
        .execute("leave lobby".parse().unwrap())
        .await;

    // The renderer never got to run before the stop request, and the stop
    // request beats the ten buffered messages.
    assert_eq!(drain(&mut rx), vec!["joined lobby", "left lobby"]);
    assert_eq!(hub.listener_count("lobby"), 0);
}

#[tokio::test]
async fn test_run_stops_on_shutdown_while_input_is_open() {
    let hub = RoomHub::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(hub.clone(), tx);

    // Input stays open: the sender is kept alive for the whole test.
    let (line_tx, lines) = futures::channel::mpsc::unbounded::<io::Result<String>>();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    line_tx.unbounded_send(Ok("join lobby".to_string())).unwrap();

    let run = console.run(lines, async {
        let _ = stop_rx.await;
    });
    let stopper = async {
        assert_eq!(next_line(&mut rx).await, "joined lobby");
        stop_tx.send(()).unwrap();
    };

    let (result, ()) = tokio::time::timeout(Duration::from_secs(1), async {
        tokio::join!(run, stopper)
    })
    .await
    .expect("console ignored the shutdown signal");
    result.unwrap();

    assert!(!line_tx.is_closed());
    assert_eq!(hub.listener_count("lobby"), 0);
}

#[test]
fn test_line_reader_forwards_lines_until_eof() {
    let input = io::Cursor::new(b"join lobby\nsay alice lobby hi\n".to_vec());
    let lines = spawn_line_reader(input);

    let collected: Vec<String> = futures::executor::block_on_stream(lines)
        .map(|line| line.unwrap())
        .collect();
    assert_eq!(collected, vec!["join lobby", "say alice lobby hi"]);
}

#[tokio::test]
async fn test_run_reports_bad_lines_and_continues() {
    let hub = RoomHub::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(hub, tx);

    let input = script(&["dance", "", "leave lobby", "quit", "rooms"]);
    console.run(input, pending()).await.unwrap();

    assert_eq!(
        drain(&mut rx),
        vec![
            "error: invalid command: unknown command `dance`",
            "not in lobby",
        ]
    );
}

#[tokio::test]
async fn test_delete_closes_joined_listener() {
    let hub = RoomHub::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(hub.clone(), tx);

    let input = script(&["join lobby", "say bob lobby yo", "delete lobby"]);
    tokio::time::timeout(Duration::from_secs(1), console.run(input, pending()))
        .await
        .expect("console hung")
        .unwrap();

    assert_eq!(
        drain(&mut rx),
        vec![
            "joined lobby",
            "[lobby] bob → yo",
            "[lobby] closed: room deleted",
            "deleted lobby",
        ]
    );
    assert!(!hub.contains_room("lobby"));
}

#[tokio::test]
async fn test_join_twice_is_reported() {
    let hub = RoomHub::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(hub.clone(), tx);

    console
        .execute(Command::Join {
            room: "lobby".to_string(),
        })
        .await;
    console
        .execute(Command::Join {
            room: "lobby".to_string(),
        })
        .await;

    assert_eq!(hub.listener_count("lobby"), 1);
    assert_eq!(drain(&mut rx), vec!["joined lobby", "already in lobby"]);

    console.shutdown().await;
    assert_eq!(hub.listener_count("lobby"), 0);
}

#[tokio::test]
async fn test_listener_from_other_session_sees_console_messages() {
    let hub = RoomHub::new();
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut console = Console::new(hub.clone(), tx);
    let mut outside = hub.open_listener("lobby");

    let keep_going = console
        .execute(Command::Say {
            user: "alice".to_string(),
            room: "lobby".to_string(),
            text: "hi".to_string(),
        })
        .await;

    assert!(keep_going);
    let delivery = outside.recv().await;
    assert_eq!(delivery.message().map(|m| m.to_string()).as_deref(), Some("alice → hi"));
}
