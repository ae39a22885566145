//! Blocking line sources bridged into async streams.

use std::io::{self, BufRead};
use std::thread;

use futures::channel::mpsc;
use tracing::debug;

/// Reads lines from `reader` on a dedicated OS thread and yields them as a
/// stream.
///
/// The thread is detached: a read blocked on an idle terminal cannot be
/// cancelled, and it must never hold up shutdown of the async runtime. It
/// ends on end of input, on a read error (forwarded once) or when the
/// receiver is dropped and the next line arrives.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded();

    thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.unbounded_send(line).is_err() || failed {
                break;
            }
        }
        debug!("Line reader finished");
    });

    rx
}

/// Lines typed on the process's standard input.
pub fn stdin_lines() -> mpsc::UnboundedReceiver<io::Result<String>> {
    spawn_line_reader(io::BufReader::new(io::stdin()))
}
