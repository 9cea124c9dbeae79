use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size grid of cells together with its mine layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// Builds a board from a mine mask, computing every adjacency count.
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        let bounds = bounds_of(mine_mask);
        let mut mine_count: CellCount = 0;
        let cells = Array2::from_shape_fn(mine_mask.dim(), |(x, y)| {
            if mine_mask[(x, y)] {
                mine_count += 1;
                return Cell::new(CellValue::Mine);
            }
            let adjacent = neighbors((x as Coord, y as Coord), bounds)
                .into_iter()
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count();
            Cell::new(CellValue::Count(adjacent as u8))
        });

        Self { cells, mine_count }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidDimensions);
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(&mine_mask))
    }

    pub fn size(&self) -> Coord2 {
        bounds_of(&self.cells)
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size.0 && coords.1 < size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    /// Valid neighbors of `coords`, edges and corners simply have fewer.
    pub fn neighbors(&self, coords: Coord2) -> Neighbors {
        neighbors(coords, self.size())
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.neighbors(coords).into_iter()
    }

    /// Every cell in row-major order, `y` outer and `x` inner.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Cell)> + '_ {
        let (x_end, y_end) = self.size();
        (0..y_end).flat_map(move |y| (0..x_end).map(move |x| ((x, y), &self[(x, y)])))
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(coords, _)| coords)
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.cells[(x as usize, y as usize)]
    }
}
