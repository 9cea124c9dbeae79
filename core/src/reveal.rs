use std::collections::{HashSet, VecDeque};

use crate::*;

/// Outcome of opening a cell
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Cells changed by one open, in the order they were opened.
#[derive(Clone, Debug, PartialEq)]
pub struct Reveal {
    pub outcome: RevealOutcome,
    pub diff: Vec<CellDiff>,
}

impl Reveal {
    const fn unchanged() -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            diff: Vec::new(),
        }
    }
}

impl Field {
    /// Opens `coords`, cascading through zero cells or disclosing every mine when it holds one.
    /// Positions off the board and cells that are not closed change nothing.
    pub fn open(&mut self, coords: Coord2) -> Reveal {
        let Some(&cell) = self.board.cell(coords) else {
            return Reveal::unchanged();
        };
        if cell.state() != CellState::Closed {
            return Reveal::unchanged();
        }

        if cell.is_mine() {
            return Reveal {
                outcome: RevealOutcome::HitMine,
                diff: self.disclose_mines(coords),
            };
        }

        let diff = self.cascade(coords);
        let outcome = if self.is_reveal_complete() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        };
        Reveal { outcome, diff }
    }

    /// Opens the triggered mine first, then every other mine not yet opened. Safe cells stay untouched.
    fn disclose_mines(&mut self, triggered: Coord2) -> Vec<CellDiff> {
        let mut diff = Vec::with_capacity(self.board.mine_count().into());
        diff.push(self.open_cell(triggered));

        let remaining: Vec<Coord2> = self
            .board
            .mine_coords()
            .filter(|&pos| pos != triggered && self.board[pos].state() != CellState::Opened)
            .collect();
        for pos in remaining {
            diff.push(self.open_cell(pos));
        }

        log::debug!("Mine hit at {:?}, disclosed {} mines", triggered, diff.len());
        diff
    }

    /// Flood fill over an explicit work-list, stopping at numbered or non-closed cells.
    fn cascade(&mut self, start: Coord2) -> Vec<CellDiff> {
        let mut diff = vec![self.open_cell(start)];
        if !self.board[start].value().is_zero() {
            return diff;
        }

        let mut visited = HashSet::from([start]);
        let mut to_visit: VecDeque<_> = self
            .board
            .iter_neighbors(start)
            .filter(|&pos| self.board[pos].state() == CellState::Closed)
            .collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            start,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            // skip flagged or already opened cells
            if self.board[visit_coords].state() != CellState::Closed {
                log::trace!("Skipping cell at {:?}", visit_coords);
                continue;
            }

            diff.push(self.open_cell(visit_coords));

            // if this is also zero we visit the neighbors
            if self.board[visit_coords].value().is_zero() {
                to_visit.extend(
                    self.board
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.board[pos].state() == CellState::Closed)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }

        log::trace!("Flood-fill from {:?} opened {} cells", start, diff.len());
        diff
    }

    fn open_cell(&mut self, coords: Coord2) -> CellDiff {
        let cell = self.board.cell_mut(coords);
        if cell.state() == CellState::Flagged {
            self.counters.flags -= 1;
            if cell.is_mine() {
                self.counters.mines_remaining += 1;
            }
        }
        let view = cell.open();
        self.counters.opened += 1;
        CellDiff::new(coords, view)
    }
}
