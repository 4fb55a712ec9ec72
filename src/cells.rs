use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::convert::From;

pub type CoordinateSmallVec = SmallVec<[Coordinate; 4]>;
pub type CoordinateOptionSmallVec = SmallVec<[Option<Coordinate>; 4]>;

/// A maze cell position. `x` grows eastwards, `y` grows southwards.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    pub fn new(x: u32, y: u32) -> Coordinate {
        Coordinate { x, y }
    }

    /// Creates a new `Coordinate` offset 1 cell away in the given direction.
    /// Returns None if the Coordinate is not representable.
    pub fn offset(&self, dir: CompassPrimary) -> Option<Coordinate> {
        let (x, y) = (self.x, self.y);
        match dir {
            CompassPrimary::North => y.checked_sub(1).map(|y| Coordinate { x, y }),
            CompassPrimary::South => y.checked_add(1).map(|y| Coordinate { x, y }),
            CompassPrimary::East => x.checked_add(1).map(|x| Coordinate { x, y }),
            CompassPrimary::West => x.checked_sub(1).map(|x| Coordinate { x, y }),
        }
    }

    /// Single step grid adjacency (no diagonals).
    pub fn is_adjacent(&self, other: Coordinate) -> bool {
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).abs();
        dx + dy == 1
    }

    /// The direction to take from `self` to reach the adjacent `other`.
    pub fn direction_to(&self, other: Coordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL.iter()
                           .cloned()
                           .find(|dir| self.offset(*dir) == Some(other))
    }
}

impl From<(u32, u32)> for Coordinate {
    fn from(x_y_pair: (u32, u32)) -> Coordinate {
        Coordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// Wall sides and movement directions. North is the top wall of a cell, East the right wall.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }
}

/// The four wall flags of one maze cell, `true` meaning the wall is closed.
///
/// Flags can only be changed through `Maze::set_wall`, which keeps the shared side of two
/// neighbouring cells in agreement.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Default, Hash, Serialize, Deserialize)]
pub struct Cell {
    top: bool,
    right: bool,
    bottom: bool,
    left: bool,
}

impl Cell {
    #[inline]
    pub fn top(&self) -> bool {
        self.top
    }

    #[inline]
    pub fn right(&self) -> bool {
        self.right
    }

    #[inline]
    pub fn bottom(&self) -> bool {
        self.bottom
    }

    #[inline]
    pub fn left(&self) -> bool {
        self.left
    }

    #[inline]
    pub fn wall(&self, side: CompassPrimary) -> bool {
        match side {
            CompassPrimary::North => self.top,
            CompassPrimary::South => self.bottom,
            CompassPrimary::East => self.right,
            CompassPrimary::West => self.left,
        }
    }

    pub fn closed_walls_count(&self) -> usize {
        [self.top, self.right, self.bottom, self.left].iter().filter(|w| **w).count()
    }

    #[inline]
    pub(crate) fn set(&mut self, side: CompassPrimary, closed: bool) {
        match side {
            CompassPrimary::North => self.top = closed,
            CompassPrimary::South => self.bottom = closed,
            CompassPrimary::East => self.right = closed,
            CompassPrimary::West => self.left = closed,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn offsets() {
        let c = Coordinate::new(1, 1);
        assert_eq!(c.offset(CompassPrimary::North), Some(Coordinate::new(1, 0)));
        assert_eq!(c.offset(CompassPrimary::South), Some(Coordinate::new(1, 2)));
        assert_eq!(c.offset(CompassPrimary::East), Some(Coordinate::new(2, 1)));
        assert_eq!(c.offset(CompassPrimary::West), Some(Coordinate::new(0, 1)));

        let origin = Coordinate::new(0, 0);
        assert_eq!(origin.offset(CompassPrimary::North), None);
        assert_eq!(origin.offset(CompassPrimary::West), None);
    }

    #[test]
    fn adjacency() {
        let c = Coordinate::new(2, 2);
        assert!(c.is_adjacent(Coordinate::new(2, 3)));
        assert!(c.is_adjacent(Coordinate::new(1, 2)));
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coordinate::new(3, 3)));
        assert!(!c.is_adjacent(Coordinate::new(4, 2)));
    }

    #[test]
    fn direction_between_neighbours() {
        let c = Coordinate::new(2, 2);
        assert_eq!(c.direction_to(Coordinate::new(2, 1)), Some(CompassPrimary::North));
        assert_eq!(c.direction_to(Coordinate::new(3, 2)), Some(CompassPrimary::East));
        assert_eq!(c.direction_to(Coordinate::new(5, 5)), None);
    }

    #[test]
    fn opposite_is_an_involution() {
        for dir in &CompassPrimary::ALL {
            assert_ne!(dir.opposite(), *dir);
            assert_eq!(dir.opposite().opposite(), *dir);
        }
    }

    #[test]
    fn cell_flags() {
        let mut cell = Cell::default();
        assert_eq!(cell.closed_walls_count(), 0);
        cell.set(CompassPrimary::East, true);
        cell.set(CompassPrimary::North, true);
        assert!(cell.right() && cell.top());
        assert!(!cell.left() && !cell.bottom());
        assert!(cell.wall(CompassPrimary::East));
        assert_eq!(cell.closed_walls_count(), 2);
    }
}
