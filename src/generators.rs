use log::{debug, trace};

use crate::cells::{CompassPrimary, Coordinate};
use crate::errors::*;
use crate::maze::Maze;
use crate::randomness::RandomSource;
use crate::units::{Height, Width};

/// Allocate a `width * height` maze and carve it with the recursive division algorithm.
pub fn generate<R>(width: Width, height: Height, rng: &mut R) -> Result<Maze>
    where R: RandomSource + ?Sized
{
    let mut maze = Maze::new(width, height)?;
    recursive_division(&mut maze, rng)?;
    debug!("generated {}x{} maze with {} passages",
           maze.width(), maze.height(), maze.passages_count());
    Ok(maze)
}

/// An inclusive rectangle of cells `[x1, x2] x [y1, y2]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Region {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
}

/// Apply the recursive division maze generation algorithm to an empty maze.
///
/// A region is split by a horizontal and a vertical wall that cross at a random pivot cell, which
/// makes four quadrants. Three of the four wall arms get one random gap each and the fourth stays
/// solid, so the quadrants are joined by exactly three passages and no loop can form. The
/// quadrants are then divided the same way.
///
/// Division stops once a region is a single cell wide or a single cell tall; such a strip stays an
/// open corridor, which is still loop free.
///
/// The regions are kept on an explicit stack rather than recursing. They are visited in the same
/// order a recursive implementation would (top left, top right, bottom left, bottom right) so the
/// random draws, and therefore seeded mazes, are the same either way.
pub fn recursive_division<R>(maze: &mut Maze, rng: &mut R) -> Result<()>
    where R: RandomSource + ?Sized
{
    let mut regions = vec![Region {
                               x1: 0,
                               y1: 0,
                               x2: maze.width() as u32 - 1,
                               y2: maze.height() as u32 - 1,
                           }];
    let mut divided_count = 0;

    while let Some(region) = regions.pop() {
        let Region { x1, y1, x2, y2 } = region;
        let x_range = x2 - x1;
        let y_range = y2 - y1;

        if x_range == 0 || y_range == 0 {
            continue;
        }

        let x_center = x1 + rng.below(x_range as usize) as u32;
        let y_center = y1 + rng.below(y_range as usize) as u32;
        trace!("dividing {:?} at ({}, {})", region, x_center, y_center);

        // Horizontal wall
        for x in x1..=x2 {
            maze.set_wall(Coordinate::new(x, y_center), CompassPrimary::South, true)?;
        }

        // Vertical wall
        for y in y1..=y2 {
            maze.set_wall(Coordinate::new(x_center, y), CompassPrimary::East, true)?;
        }

        // Arms in the order top, right, bottom, left. One stays solid.
        let mut arm_gaps = [true; 4];
        arm_gaps[rng.below(4)] = false;

        if arm_gaps[0] {
            let y = y1 + pick_in(rng, y_center - y1 + 1);
            maze.set_wall(Coordinate::new(x_center, y), CompassPrimary::East, false)?;
        }
        if arm_gaps[1] {
            let x = x_center + 1 + pick_in(rng, x2 - x_center);
            maze.set_wall(Coordinate::new(x, y_center), CompassPrimary::South, false)?;
        }
        if arm_gaps[2] {
            let y = y_center + 1 + pick_in(rng, y2 - y_center);
            maze.set_wall(Coordinate::new(x_center, y), CompassPrimary::East, false)?;
        }
        if arm_gaps[3] {
            let x = x1 + pick_in(rng, x_center - x1 + 1);
            maze.set_wall(Coordinate::new(x, y_center), CompassPrimary::South, false)?;
        }

        // Pushed in reverse so the top left quadrant is divided first
        regions.push(Region { x1: x_center + 1, y1: y_center + 1, x2, y2 });
        regions.push(Region { x1, y1: y_center + 1, x2: x_center, y2 });
        regions.push(Region { x1: x_center + 1, y1, x2, y2: y_center });
        regions.push(Region { x1, y1, x2: x_center, y2: y_center });
        divided_count += 1;
    }

    debug!("recursive division split {} regions", divided_count);
    Ok(())
}

#[inline]
fn pick_in<R: RandomSource + ?Sized>(rng: &mut R, size: u32) -> u32 {
    rng.below(size as usize) as u32
}
