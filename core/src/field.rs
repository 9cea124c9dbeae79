use serde::{Deserialize, Serialize};

use crate::*;

/// Per-round counters, recreated together with the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub opened: CellCount,
    pub flags: CellCount,
    /// Mines that do not carry a flag.
    pub mines_remaining: CellCount,
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
    Won,
}

impl MarkOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
            Self::Won => true,
        }
    }
}

/// Board plus counters for one round. Replaced wholesale on restart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub(crate) board: Board,
    pub(crate) counters: Counters,
}

impl Field {
    pub fn new(board: Board) -> Self {
        let counters = Counters {
            mines_remaining: board.mine_count(),
            ..Counters::default()
        };
        Self { board, counters }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn opened_count(&self) -> CellCount {
        self.counters.opened
    }

    pub fn flags_count(&self) -> CellCount {
        self.counters.flags
    }

    pub fn mines_remaining(&self) -> CellCount {
        self.counters.mines_remaining
    }

    /// Every non-mine cell is opened or accounted for by a flag.
    pub fn is_reveal_complete(&self) -> bool {
        let Counters {
            opened,
            flags,
            mines_remaining,
        } = self.counters;
        opened + flags == self.board.total_cells() - mines_remaining
    }

    /// Every flag sits on a mine and every mine is flagged.
    pub fn is_flag_complete(&self) -> bool {
        self.counters.mines_remaining == 0 && self.counters.flags == self.board.mine_count()
    }

    /// Toggles the flag at `coords`, opened cells and positions off the board are left alone.
    pub fn toggle_flag(&mut self, coords: Coord2) -> (MarkOutcome, Option<CellDiff>) {
        if !self.board.contains(coords) {
            return (MarkOutcome::NoChange, None);
        }
        let cell = self.board.cell_mut(coords);
        let is_mine = cell.is_mine();

        match cell.toggle_flag() {
            None => (MarkOutcome::NoChange, None),
            Some(state) => {
                match state {
                    CellState::Flagged => {
                        self.counters.flags += 1;
                        if is_mine {
                            self.counters.mines_remaining -= 1;
                        }
                    }
                    _ => {
                        self.counters.flags -= 1;
                        if is_mine {
                            self.counters.mines_remaining += 1;
                        }
                    }
                }
                log::debug!("Flag at {:?} is now {:?}", coords, state);

                let diff = CellDiff::new(coords, self.board[coords].view());
                let outcome = if self.is_flag_complete() {
                    MarkOutcome::Won
                } else {
                    MarkOutcome::Changed
                };
                (outcome, Some(diff))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(size: Coord2, mines: &[Coord2]) -> Field {
        Field::new(Board::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn flag_twice_restores_counters() {
        let mut field = field((3, 3), &[(0, 0), (2, 2)]);

        let (outcome, diff) = field.toggle_flag((1, 1));
        assert_eq!(outcome, MarkOutcome::Changed);
        assert_eq!(diff, Some(CellDiff::new((1, 1), CellView::Flagged)));
        assert_eq!(field.flags_count(), 1);
        assert_eq!(field.mines_remaining(), 2);

        let (_, diff) = field.toggle_flag((1, 1));
        assert_eq!(diff, Some(CellDiff::new((1, 1), CellView::Closed)));
        assert_eq!(field.counters(), Counters { opened: 0, flags: 0, mines_remaining: 2 });
    }

    #[test]
    fn flags_on_mines_reduce_remaining() {
        let mut field = field((3, 3), &[(0, 0), (2, 2)]);

        field.toggle_flag((0, 0));
        assert_eq!(field.mines_remaining(), 1);

        field.toggle_flag((0, 0));
        assert_eq!(field.mines_remaining(), 2);
    }

    #[test]
    fn flagging_every_mine_wins() {
        let mut field = field((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(field.toggle_flag((0, 0)).0, MarkOutcome::Changed);
        assert_eq!(field.toggle_flag((2, 2)).0, MarkOutcome::Won);
    }

    #[test]
    fn extra_flag_blocks_flag_win() {
        let mut field = field((3, 3), &[(0, 0), (2, 2)]);

        field.toggle_flag((1, 0));
        field.toggle_flag((0, 0));

        assert_eq!(field.toggle_flag((2, 2)).0, MarkOutcome::Changed);
        assert!(!field.is_flag_complete());
    }

    #[test]
    fn off_board_flag_changes_nothing() {
        let mut field = field((3, 2), &[(0, 0)]);

        let (outcome, diff) = field.toggle_flag((0, 2));

        assert!(!outcome.has_update());
        assert_eq!(diff, None);
        assert_eq!(field.flags_count(), 0);
    }

    #[test]
    fn opened_cells_cannot_be_flagged() {
        let mut field = field((3, 1), &[(0, 0)]);
        field.open((1, 0));

        assert_eq!(field.toggle_flag((1, 0)), (MarkOutcome::NoChange, None));
        assert_eq!(field.flags_count(), 0);
    }
}
