use ndarray::Array2;
use smallvec::SmallVec;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Up to 8 neighbor positions, kept inline.
pub type Neighbors = SmallVec<[Coord2; 8]>;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Owning iterator over [`Neighbors`].
pub type NeighborIter = smallvec::IntoIter<[Coord2; 8]>;

/// Axis span of the 3x3 window around `center`, clipped to `0..end`.
fn window(center: Coord, end: Coord) -> core::ops::RangeInclusive<Coord> {
    center.saturating_sub(1)..=center.saturating_add(1).min(end.saturating_sub(1))
}

/// Positions around `center` that lie inside `bounds`, `x` outer and `y` inner.
pub fn neighbors(center: Coord2, bounds: Coord2) -> Neighbors {
    let mut found = Neighbors::new();
    for x in window(center.0, bounds.0) {
        for y in window(center.1, bounds.1) {
            if (x, y) != center {
                found.push((x, y));
            }
        }
    }
    found
}

/// Board dimensions of an array indexed by [`ToNdIndex`].
pub fn bounds_of<T>(array: &Array2<T>) -> Coord2 {
    let (x, y) = array.dim();
    // boards are built from `Coord` sizes, so both axes fit
    (x as Coord, y as Coord)
}
