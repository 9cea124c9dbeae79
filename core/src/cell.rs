use serde::{Deserialize, Serialize};

use crate::*;

/// What a cell hides: a mine or the number of adjacent mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellValue {
    Mine,
    Count(u8),
}

impl CellValue {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Count(0))
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Count(0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Closed,
    Opened,
    Flagged,
}

impl Default for CellState {
    fn default() -> Self {
        Self::Closed
    }
}

/// How a cell is exposed to observers, the value only travels with opened cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum CellView {
    Closed,
    Opened { value: CellValue },
    Flagged,
}

/// Single board cell. The value is fixed once the board is generated, only the state moves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    value: CellValue,
    state: CellState,
}

impl Cell {
    pub const fn new(value: CellValue) -> Self {
        Self {
            value,
            state: CellState::Closed,
        }
    }

    pub const fn value(&self) -> CellValue {
        self.value
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn is_mine(&self) -> bool {
        self.value.is_mine()
    }

    /// Opens the cell. Callers must check it is not already opened.
    pub fn open(&mut self) -> CellView {
        debug_assert_ne!(self.state, CellState::Opened, "cell opened twice");
        self.state = CellState::Opened;
        self.view()
    }

    /// Closed -> Flagged, returns whether anything changed.
    pub fn set_flag(&mut self) -> bool {
        if self.state == CellState::Closed {
            self.state = CellState::Flagged;
            true
        } else {
            false
        }
    }

    /// Flagged -> Closed, returns whether anything changed.
    pub fn remove_flag(&mut self) -> bool {
        if self.state == CellState::Flagged {
            self.state = CellState::Closed;
            true
        } else {
            false
        }
    }

    /// Closed <-> Flagged, `None` for opened cells.
    pub fn toggle_flag(&mut self) -> Option<CellState> {
        match self.state {
            CellState::Closed => {
                self.state = CellState::Flagged;
            }
            CellState::Flagged => {
                self.state = CellState::Closed;
            }
            CellState::Opened => return None,
        }
        Some(self.state)
    }

    pub const fn view(&self) -> CellView {
        match self.state {
            CellState::Closed => CellView::Closed,
            CellState::Opened => CellView::Opened { value: self.value },
            CellState::Flagged => CellView::Flagged,
        }
    }
}

/// One entry of a diff: where the change happened and how the cell now looks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDiff {
    pub x: Coord,
    pub y: Coord,
    #[serde(flatten)]
    pub cell: CellView,
}

impl CellDiff {
    pub const fn new((x, y): Coord2, cell: CellView) -> Self {
        Self { x, y, cell }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.x, self.y)
    }
}
