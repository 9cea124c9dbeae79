use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Terminal round state, only the countdown still moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ended {
    pub outcome: Outcome,
    pub seconds_left: u32,
}

/// Valid transitions:
/// - Started -> Ended(Won | Lost, timeout)
/// - Ended(_, n) -> Ended(_, n - 1) on every tick
/// - Ended(_, 0) -> Started with a fresh board
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum GameState {
    #[default]
    Started,
    Ended(Ended),
}

impl GameState {
    pub const fn is_started(self) -> bool {
        matches!(self, Self::Started)
    }

    pub const fn ended(self) -> Option<Ended> {
        match self {
            Self::Started => None,
            Self::Ended(ended) => Some(ended),
        }
    }
}

/// What a timer tick did to the round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Tick {
    /// Not the armed timer, or the round is not counting down.
    Ignored,
    /// Countdown moved, carrying the seconds still left.
    Countdown(u32),
    /// Countdown reached zero and the timer was released.
    Expired,
}

/// Round lifecycle: the game state plus the timer driving the restart countdown.
#[derive(Clone, Debug, PartialEq, Default)]
pub(crate) struct Round {
    state: GameState,
    timer: Option<TimerId>,
}

impl Round {
    pub(crate) fn started() -> Self {
        Self::default()
    }

    pub(crate) fn state(&self) -> GameState {
        self.state
    }

    pub(crate) fn is_started(&self) -> bool {
        self.state.is_started()
    }

    /// Moves to `Ended`, a round can only end once.
    pub(crate) fn end(&mut self, outcome: Outcome, seconds_left: u32) -> Ended {
        debug_assert!(self.state.is_started(), "round ended twice");
        let ended = Ended {
            outcome,
            seconds_left,
        };
        self.state = GameState::Ended(ended);
        ended
    }

    pub(crate) fn arm(&mut self, timer: TimerId) {
        self.timer = Some(timer);
    }

    pub(crate) fn tick(&mut self, timer: TimerId) -> Tick {
        if self.timer != Some(timer) {
            return Tick::Ignored;
        }
        let GameState::Ended(ended) = &mut self.state else {
            return Tick::Ignored;
        };

        ended.seconds_left = ended.seconds_left.saturating_sub(1);
        if ended.seconds_left == 0 {
            self.timer = None;
            Tick::Expired
        } else {
            Tick::Countdown(ended.seconds_left)
        }
    }
}
