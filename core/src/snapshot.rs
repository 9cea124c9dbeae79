use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a newly connected observer needs to draw the current board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: Coord,
    pub height: Coord,
    pub mines_count: CellCount,
    pub flags_count: CellCount,
    pub game_state: GameState,
    /// Every cell that is not closed, opened ones with their value.
    pub visible_cells: Vec<CellDiff>,
}

impl Snapshot {
    pub fn from_field(field: &Field, game_state: GameState) -> Self {
        let board = field.board();
        let (width, height) = board.size();
        let visible_cells = board
            .iter()
            .filter(|(_, cell)| cell.state() != CellState::Closed)
            .map(|(coords, cell)| CellDiff::new(coords, cell.view()))
            .collect();

        Self {
            width,
            height,
            mines_count: board.mine_count(),
            flags_count: field.flags_count(),
            game_state,
            visible_cells,
        }
    }
}
