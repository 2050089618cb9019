//! Control relay: a localhost TCP listener accepting newline-delimited JSON
//! commands from companion tooling (global hotkey daemons, scripts).
//!
//! Messages are funneled into the UI thread over a channel; the event loop
//! drains it once per tick. Malformed lines are logged and skipped, never
//! fatal.

use std::io::{self, BufRead, BufReader};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use serde::Deserialize;

use crate::shortcuts::StepDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchDirection {
    Next,
    Prev,
}

impl From<SwitchDirection> for StepDirection {
    fn from(direction: SwitchDirection) -> Self {
        match direction {
            SwitchDirection::Next => StepDirection::Next,
            SwitchDirection::Prev => StepDirection::Prev,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    #[serde(rename = "MODEL_SWITCH")]
    ModelSwitch { direction: SwitchDirection },
    #[serde(rename = "SELECT_TARGET")]
    SelectTarget { id: String },
}

/// Bind `127.0.0.1:port` and feed parsed commands into the returned channel.
/// The accept loop runs on its own thread for the life of the process.
pub fn spawn_listener(port: u16) -> io::Result<Receiver<ControlMessage>> {
    let listener = TcpListener::bind(("127.0.0.1", port))?;
    let local = listener.local_addr()?;
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("control-relay".to_string())
        .spawn(move || {
            tracing::debug!(%local, "control relay listening");
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => {
                        let tx = tx.clone();
                        thread::spawn(move || serve_connection(stream, tx));
                    }
                    Err(err) => tracing::warn!(error = %err, "control relay accept failed"),
                }
            }
        })?;
    Ok(rx)
}

fn serve_connection(stream: TcpStream, tx: Sender<ControlMessage>) {
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::debug!(error = %err, "control connection closed");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ControlMessage>(&line) {
            Ok(message) => {
                if tx.send(message).is_err() {
                    return;
                }
            }
            Err(err) => tracing::warn!(error = %err, line, "ignoring malformed control message"),
        }
    }
}
