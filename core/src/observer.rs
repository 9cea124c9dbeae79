use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

use crate::*;

/// Receives everything the engine announces. One observer per engine, every hook defaults to doing nothing.
pub trait GameObserver {
    /// A fresh round began.
    fn on_started(&mut self, _snapshot: &Snapshot) {}

    /// Cells changed, `ended` is set when this change finished the round.
    fn on_update(&mut self, _diff: &[CellDiff], _ended: Option<Ended>) {}

    /// The restart countdown moved.
    fn on_restart_countdown(&mut self, _seconds_left: u32) {}
}

/// Owned form of every observer hook.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started(Snapshot),
    Updated {
        diff: Vec<CellDiff>,
        ended: Option<Ended>,
    },
    RestartCountdown {
        seconds_left: u32,
    },
}

impl GameObserver for Sender<GameEvent> {
    fn on_started(&mut self, snapshot: &Snapshot) {
        if self.send(GameEvent::Started(snapshot.clone())).is_err() {
            log::trace!("Event receiver dropped");
        }
    }

    fn on_update(&mut self, diff: &[CellDiff], ended: Option<Ended>) {
        let event = GameEvent::Updated {
            diff: diff.to_vec(),
            ended,
        };
        if self.send(event).is_err() {
            log::trace!("Event receiver dropped");
        }
    }

    fn on_restart_countdown(&mut self, seconds_left: u32) {
        if self.send(GameEvent::RestartCountdown { seconds_left }).is_err() {
            log::trace!("Event receiver dropped");
        }
    }
}
