//! roomcast console
//!
//! Reads commands from stdin and drives an in-process room broadcast hub.
//! Type `join <room>`, `say <user> <room> <text>`, `leave <room>`,
//! `delete <room>`, `rooms` or `quit`.

use std::process::ExitCode;

use roomcast::config::load_config;
use roomcast::console::{Console, stdin_lines};
use roomcast::hub::{HubConfig, RoomHub};
use roomcast::utils::error::Result;
use roomcast::utils::logging;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // No-op when `run` already installed the configured subscriber.
            logging::init("info");
            error!("roomcast failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let settings = load_config()?;
    logging::init(&settings.logging.level);

    let hub = RoomHub::with_config(HubConfig::from(&settings.hub));
    info!(
        listener_capacity = settings.hub.listener_capacity,
        overflow_policy = ?settings.hub.overflow_policy,
        "Starting roomcast console"
    );

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(async move {
        while let Some(line) = out_rx.recv().await {
            println!("{line}");
        }
    });

    let mut console = Console::new(hub, out_tx);
    let result = console.run(stdin_lines(), shutdown_signal()).await;

    drop(console);
    let _ = printer.await;

    result
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received. Exiting gracefully."),
        Err(e) => {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
