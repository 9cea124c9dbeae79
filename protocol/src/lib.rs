//! Messages exchanged between the shared board and its observers, one JSON object per line.

use cosweep_core::{CellDiff, Ended, GameEvent, Snapshot};
use serde::{Deserialize, Serialize};

/// Requests a client may send. Coordinates stay raw numbers until the engine has checked them.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "cell:open")]
    Open { x: f64, y: f64 },
    #[serde(rename = "cell:flag")]
    Flag { x: f64, y: f64 },
}

/// Everything the server pushes to clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerMessage {
    /// Current board, sent once to a client right after it connects.
    #[serde(rename = "game:loaded")]
    Loaded(Snapshot),
    #[serde(rename = "game:started")]
    Started(Snapshot),
    #[serde(rename = "game:update")]
    Update {
        diff: Vec<CellDiff>,
        ended: Option<Ended>,
    },
    #[serde(rename = "game:restart-countdown")]
    RestartCountdown { seconds_left: u32 },
}

impl From<GameEvent> for ServerMessage {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::Started(snapshot) => Self::Started(snapshot),
            GameEvent::Updated { diff, ended } => Self::Update { diff, ended },
            GameEvent::RestartCountdown { seconds_left } => Self::RestartCountdown { seconds_left },
        }
    }
}

/// Encodes a message as a single line, trailing newline included.
pub fn encode_line<T: Serialize>(message: &T) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

pub fn decode_line<'a, T: Deserialize<'a>>(line: &'a str) -> serde_json::Result<T> {
    serde_json::from_str(line.trim_end())
}
