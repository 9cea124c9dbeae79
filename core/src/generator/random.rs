use ndarray::Array2;
use rand::Rng;

use super::*;

/// Rejection sampling: draw uniform positions until enough distinct ones hold a mine.
///
/// Terminates because [`GameConfig`] guarantees at least one safe cell, expected draws stay close to the mine count
/// on sparse boards.
#[derive(Debug)]
pub struct RandomBoardGenerator<'a, R: Rng> {
    rng: &'a mut R,
}

impl<'a, R: Rng> RandomBoardGenerator<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> BoardGenerator for RandomBoardGenerator<'_, R> {
    fn generate(&mut self, config: &GameConfig) -> Board {
        let (width, height) = config.size;
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut mines_placed: CellCount = 0;
        let mut draws: u32 = 0;

        while mines_placed < config.mines {
            let coords = (
                self.rng.random_range(0..width),
                self.rng.random_range(0..height),
            );
            draws += 1;
            let tile = &mut mine_mask[coords.to_nd_index()];
            if !*tile {
                *tile = true;
                mines_placed += 1;
            }
        }

        log::debug!(
            "Placed {} mines on {}x{} board in {} draws",
            mines_placed,
            width,
            height,
            draws
        );
        Board::from_mine_mask(&mine_mask)
    }
}
