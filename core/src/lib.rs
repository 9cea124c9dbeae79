use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use field::*;
pub use generator::*;
pub use observer::*;
pub use reveal::*;
pub use round::*;
pub use scheduler::*;
pub use snapshot::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod field;
mod generator;
mod observer;
mod reveal;
mod round;
mod scheduler;
mod snapshot;
mod types;

/// Seconds between the end of a round and the next one.
pub const DEFAULT_RESTART_TIMEOUT_SECS: u32 = 3;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
    pub restart_timeout_secs: u32,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self {
            size,
            mines,
            restart_timeout_secs: DEFAULT_RESTART_TIMEOUT_SECS,
        }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked((9, 9), 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked((16, 16), 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked((30, 16), 99)
    }

    pub const fn with_restart_timeout(mut self, secs: u32) -> Self {
        self.restart_timeout_secs = secs;
        self
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Mine placement only terminates when at least one cell stays safe.
    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if self.mines == 0 {
            return Err(GameError::NoMines);
        }
        if self.mines >= self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }
}

impl Board {
    /// Configuration matching this board's size and mines, with the default restart timeout.
    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for config in [
            GameConfig::beginner(),
            GameConfig::intermediate(),
            GameConfig::expert(),
        ] {
            assert_eq!(config.validate(), Ok(()));
            assert_eq!(config.restart_timeout_secs, DEFAULT_RESTART_TIMEOUT_SECS);
        }
    }

    #[test]
    fn rejects_degenerate_configs() {
        assert_eq!(GameConfig::new((0, 5), 1), Err(GameError::InvalidDimensions));
        assert_eq!(GameConfig::new((5, 5), 0), Err(GameError::NoMines));
        assert_eq!(GameConfig::new((5, 5), 25), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::new((5, 5), 30), Err(GameError::TooManyMines));
        assert!(GameConfig::new((5, 5), 24).is_ok());
    }

    #[test]
    fn restart_timeout_is_configurable() {
        let config = GameConfig::new((5, 5), 5).unwrap().with_restart_timeout(10);
        assert_eq!(config.restart_timeout_secs, 10);
    }
}
